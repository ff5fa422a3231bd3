//! Conversation sessions on durable storage
//!
//! Each conversation is a pretty-printed JSON record paired with a
//! plain-text audit log, both keyed by the conversation's creation time.

pub mod identity;
pub mod record;
pub mod repository;
pub mod store;
pub mod title;

pub use identity::RecordId;
pub use record::{ConversationRecord, Role, Turn};
pub use repository::{
    CatalogSummary, ConfirmedDelete, Conversation, PendingDelete, SessionRepository,
};
pub use store::{DeleteReport, RecordStore, Removal};
pub use title::{derive_title, lookup_title, MAX_TITLE_CHARS, UNTITLED};
