//! Core types for statefulchat
//!
//! This crate provides conversation records, their on-disk store, the
//! session catalog, configuration and logging used by the other crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod utils;

pub use error::{Error, Result};
