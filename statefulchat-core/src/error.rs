//! Error types for statefulchat

use thiserror::Error;

use crate::session::DeleteReport;

/// The main error type for statefulchat operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No record exists for the identity
    #[error("Conversation not found: {0}")]
    NotFound(String),

    /// Stored bytes do not parse as a valid turn sequence
    #[error("Conversation {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    /// Persisting a record or appending to an audit log failed
    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    /// Only part of a record/audit-log pair could be removed
    #[error("Delete incomplete: {0}")]
    PartialDelete(DeleteReport),

    /// The chat-completion collaborator failed
    #[error("Model call failed: {0}")]
    ModelCallFailed(String),

    /// Bad menu input
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A specialized Result type for statefulchat operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
