//! Configuration management
//!
//! Handles loading and validation of statefulchat configuration from files
//! and environment variables.

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::ConfigLoader;
pub use schema::*;
