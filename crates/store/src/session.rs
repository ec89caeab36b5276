//! Previous-session pointer.
//!
//! A single plain-text file remembering which session was last active, so
//! the next startup can offload that session's remaining live turns before
//! a new conversation begins.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;
use windlass_core::error::StorageError;
use windlass_core::turn::SessionId;

/// Pointer file at `<data_dir>/prev_session_id.txt`.
pub struct PreviousSession {
    path: PathBuf,
}

impl PreviousSession {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join("prev_session_id.txt"),
        }
    }

    /// The previously active session, if any was recorded.
    pub fn load(&self) -> Option<SessionId> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Previous session pointer unreadable");
                return None;
            }
        };

        let id = content.trim();
        if id.is_empty() {
            None
        } else {
            Some(SessionId::from(id))
        }
    }

    /// Point the file at the given session.
    pub fn store(&self, session_id: &SessionId) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Write {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        std::fs::write(&self.path, session_id.as_str()).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_pointer_is_none() {
        let dir = tempdir().unwrap();
        let prev = PreviousSession::new(dir.path());
        assert!(prev.load().is_none());
    }

    #[test]
    fn store_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let prev = PreviousSession::new(dir.path());
        prev.store(&SessionId::from("session-42")).unwrap();
        assert_eq!(prev.load(), Some(SessionId::from("session-42")));
    }

    #[test]
    fn store_overwrites_pointer() {
        let dir = tempdir().unwrap();
        let prev = PreviousSession::new(dir.path());
        prev.store(&SessionId::from("old")).unwrap();
        prev.store(&SessionId::from("new")).unwrap();
        assert_eq!(prev.load(), Some(SessionId::from("new")));
    }

    #[test]
    fn blank_file_is_none() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join("prev_session_id.txt"), "  \n").unwrap();
        let prev = PreviousSession::new(dir.path());
        assert!(prev.load().is_none());
    }
}
