//! Chat-completion provider integrations for statefulchat
//!
//! The conversation loop only sees the [`LLMProvider`] trait: an ordered
//! list of role/content messages in, a single reply (or a failure) out.

pub mod base;
pub mod openai;

pub use base::{LLMProvider, LLMResponse, Message, ProviderError, ProviderResult};
pub use openai::OpenAICompatClient;
