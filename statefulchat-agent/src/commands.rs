//! Command tokens accepted at the catalog and inside a session
//!
//! Matching is case-insensitive on trimmed input. Spanish aliases are
//! accepted alongside the English ones.

use statefulchat_core::Error;

const EXIT: &[&str] = &["exit", "quit", "salir", "s"];
const NEW: &[&str] = &["new", "nuevo", "n"];
const DELETE: &[&str] = &["delete", "borrar", "b"];
const CANCEL: &[&str] = &["cancel", "cancelar", "c"];
const YES: &[&str] = &["yes", "y", "sí", "si", "s"];
const SESSION_EXIT: &[&str] = &["exit", "quit", "salir"];
const SESSION_HISTORY: &[&str] = &["history", "context", "contexto"];

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Parse a 1-based index into a list of `count` entries
fn parse_index(token: &str, count: usize) -> Option<Result<usize, Error>> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(match token.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(Error::InvalidSelection(format!(
            "{} is not between 1 and {}",
            token, count
        ))),
    })
}

/// A choice at the main catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    New,
    Delete,
    /// 0-based index into the listing
    Open(usize),
}

impl MenuChoice {
    pub fn parse(input: &str, count: usize) -> Result<Self, Error> {
        let token = normalize(input);
        if EXIT.contains(&token.as_str()) {
            return Ok(MenuChoice::Exit);
        }
        if NEW.contains(&token.as_str()) {
            return Ok(MenuChoice::New);
        }
        if DELETE.contains(&token.as_str()) {
            return Ok(MenuChoice::Delete);
        }
        match parse_index(&token, count) {
            Some(index) => index.map(MenuChoice::Open),
            None => Err(Error::InvalidSelection(format!(
                "unrecognized option '{}'",
                input.trim()
            ))),
        }
    }
}

/// A choice in the delete listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Cancel,
    /// 0-based index into the listing
    Target(usize),
}

impl DeleteChoice {
    pub fn parse(input: &str, count: usize) -> Result<Self, Error> {
        let token = normalize(input);
        if CANCEL.contains(&token.as_str()) {
            return Ok(DeleteChoice::Cancel);
        }
        match parse_index(&token, count) {
            Some(index) => index.map(DeleteChoice::Target),
            None => Err(Error::InvalidSelection(format!(
                "unrecognized option '{}'",
                input.trim()
            ))),
        }
    }
}

/// Anything but an explicit yes counts as no
pub fn is_affirmative(input: &str) -> bool {
    YES.contains(&normalize(input).as_str())
}

/// Input typed inside a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Exit,
    ShowHistory,
    Message(String),
}

impl SessionInput {
    pub fn parse(input: &str) -> Self {
        let token = normalize(input);
        if SESSION_EXIT.contains(&token.as_str()) {
            SessionInput::Exit
        } else if SESSION_HISTORY.contains(&token.as_str()) {
            SessionInput::ShowHistory
        } else {
            SessionInput::Message(input.to_string())
        }
    }
}
