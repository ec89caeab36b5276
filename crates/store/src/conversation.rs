//! File-based conversation store — one JSON file per session.
//!
//! Each session lives at `<data_dir>/conversations/<session_id>.json` as a
//! flat JSON array of turns. A missing file is a normal state and loads as
//! an empty conversation; an unreadable or unparsable file degrades to empty
//! with a warning rather than failing the caller.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};
use windlass_core::error::StorageError;
use windlass_core::store::ConversationStore;
use windlass_core::turn::{SessionId, Turn};

/// A conversation store writing one JSON array per session.
pub struct FileConversationStore {
    root: PathBuf,
}

impl FileConversationStore {
    /// Create a store rooted at `<data_dir>/conversations`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into().join("conversations"),
        }
    }

    fn session_path(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(format!("{session_id}.json"))
    }

    fn read_turns(&self, session_id: &SessionId) -> Vec<Turn> {
        let path = self.session_path(session_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Conversation unreadable, treating as empty");
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<Turn>>(&content) {
            Ok(turns) => turns,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Conversation unparsable, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_turns(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StorageError> {
        let path = self.session_path(session_id);

        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::Write {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        let content = serde_json::to_string_pretty(turns)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        std::fs::write(&path, content).map_err(|e| StorageError::Write {
            path,
            reason: e.to_string(),
        })
    }

    /// Session ids that have a stored conversation, unordered.
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem()
                        .map(|stem| SessionId::from(&stem.to_string_lossy()))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StorageError> {
        let turns = self.read_turns(session_id);
        debug!(session = %session_id, count = turns.len(), "Loaded conversation");
        Ok(turns)
    }

    async fn append(&self, session_id: &SessionId, turn: Turn) -> Result<(), StorageError> {
        let mut turns = self.read_turns(session_id);
        turns.push(turn);
        self.write_turns(session_id, &turns)
    }
}
