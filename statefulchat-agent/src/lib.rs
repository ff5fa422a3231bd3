//! Conversation flow for statefulchat
//!
//! The catalog state machine picks or creates a conversation, then the
//! session runs the turn loop against a chat-completion provider.

pub mod commands;
pub mod conversation;
pub mod selection;
pub mod ui;

#[cfg(test)]
mod testing;

pub use commands::{is_affirmative, DeleteChoice, MenuChoice, SessionInput};
pub use conversation::{ConversationSession, ModelSettings, SessionEnd, TurnOutcome};
pub use selection::{Selected, SelectionMachine, SelectionOutcome, SelectionState};
pub use ui::{ChatDisplay, ListingPurpose, Notice, Prompt, Prompter};
