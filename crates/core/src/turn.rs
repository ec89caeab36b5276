//! Turn and session domain types.
//!
//! A conversation is an ordered `Vec<Turn>` keyed by a [`SessionId`]. Turns
//! are immutable once written; ordering is append order. The timestamp is a
//! plain string (ISO-8601, local offset, second precision) so that persisted
//! turns round-trip byte-for-byte through the ledger's structural equality.

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant reply
    Assistant,
}

impl Role {
    /// Capitalized label used in rendered transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// ISO-8601 timestamp with local offset, second precision
    pub timestamp: String,
}

impl Turn {
    /// Create a new user turn stamped with the current local time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: now_local(),
        }
    }

    /// Create a new assistant turn stamped with the current local time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: now_local(),
        }
    }

    /// Create a turn with an explicit timestamp (replays, tests).
    pub fn with_timestamp(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Current local time as ISO-8601 with offset, second precision.
pub fn now_local() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
