//! Conversation store abstraction.
//!
//! A conversation is persisted as a flat, append-friendly list of turns per
//! session. An absent session is a normal state and loads as empty.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::turn::{SessionId, Turn};

/// Durable store for per-session conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Load a session's turns in append order. Empty if the session has no
    /// stored conversation yet.
    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StorageError>;

    /// Append one turn to a session's conversation.
    async fn append(&self, session_id: &SessionId, turn: Turn) -> Result<(), StorageError>;
}
