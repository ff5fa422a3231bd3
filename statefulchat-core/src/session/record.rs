//! Conversation record data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Originator of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation.
///
/// Serialized as `{"role": ..., "content": ..., "title"?: ...}`. Only the
/// system variant can carry a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    System {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
    },
}

impl Turn {
    /// Create a system turn without a title
    pub fn system(content: impl Into<String>) -> Self {
        Turn::System {
            content: content.into(),
            title: None,
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User {
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Turn::System { .. } => Role::System,
            Turn::User { .. } => Role::User,
            Turn::Assistant { .. } => Role::Assistant,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Turn::System { content, .. }
            | Turn::User { content }
            | Turn::Assistant { content } => content,
        }
    }

    /// Stored title, present only on an annotated system turn
    pub fn title(&self) -> Option<&str> {
        match self {
            Turn::System { title, .. } => title.as_deref(),
            _ => None,
        }
    }
}

/// The full ordered turn history of one conversation.
///
/// Always starts with exactly one system turn. Insertion order is the
/// order sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationRecord {
    turns: Vec<Turn>,
}

impl ConversationRecord {
    /// Create a record holding only the system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    /// Build a record from stored turns: one leading system turn, no other
    pub fn from_turns(turns: Vec<Turn>) -> Result<Self, String> {
        match turns.first() {
            None => return Err("record contains no turns".to_string()),
            Some(turn) if turn.role() != Role::System => {
                return Err(format!(
                    "first turn must be a system turn, found {}",
                    turn.role()
                ))
            }
            Some(_) => {}
        }
        if let Some(position) = turns
            .iter()
            .skip(1)
            .position(|turn| turn.role() == Role::System)
        {
            return Err(format!("unexpected system turn at index {}", position + 1));
        }
        Ok(Self { turns })
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of user turns so far
    pub fn user_turn_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role() == Role::User)
            .count()
    }

    /// Title stored on the system turn, if any
    pub fn stored_title(&self) -> Option<&str> {
        self.turns.first().and_then(Turn::title)
    }

    /// Annotate the system turn with a title.
    ///
    /// Returns false if the title was already set; the first title wins.
    pub fn set_title(&mut self, new_title: impl Into<String>) -> bool {
        match self.turns.first_mut() {
            Some(Turn::System { title, .. }) if title.is_none() => {
                *title = Some(new_title.into());
                true
            }
            _ => false,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }
}

impl<'de> Deserialize<'de> for ConversationRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let turns = Vec::<Turn>::deserialize(deserializer)?;
        ConversationRecord::from_turns(turns).map_err(serde::de::Error::custom)
    }
}
