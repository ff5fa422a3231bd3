//! Presentation and input capabilities used by the catalog and the session
//!
//! The logic in this crate only talks to these traits. The terminal client
//! provides a styled and a plain implementation of each.

use statefulchat_core::session::{CatalogSummary, RecordId, Turn};
use std::io;

/// Why a listing is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPurpose {
    /// Main catalog: load, create, delete or exit
    Browse,
    /// Picking a conversation to delete
    Delete,
}

/// Informational messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ConversationLoaded(RecordId),
    NewConversation(RecordId),
    /// Commands available inside a session
    SessionHelp,
    Deleted { title: String },
    DeleteCancelled,
    Goodbye,
}

/// What the user is being asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Catalog option, with the number of listed conversations
    MenuChoice { count: usize },
    /// Conversation to delete, with the number of listed conversations
    DeleteChoice { count: usize },
    /// Yes/no before deleting
    ConfirmDelete { title: String },
    /// Free text for the next turn
    UserTurn,
}

/// Render-side capability
pub trait ChatDisplay {
    fn render_listing(&self, summaries: &[CatalogSummary], purpose: ListingPurpose);

    /// A single turn as it happens
    fn render_turn(&self, turn: &Turn);

    /// The full turn sequence of the live record
    fn render_history(&self, turns: &[Turn]);

    fn render_notice(&self, notice: Notice);

    fn render_error(&self, message: &str);

    /// Called right before the model call
    fn begin_wait(&self) {}

    /// Called once the model call returned
    fn end_wait(&self) {}
}

/// Input-side capability
pub trait Prompter {
    /// Read one line of input. `Ok(None)` means input is exhausted.
    fn read_line(&mut self, prompt: Prompt) -> io::Result<Option<String>>;
}
