//! Offload ledger — the durable record of already-migrated turns.
//!
//! One JSON array per session at `<data_dir>/ledger/<session_id>.json`,
//! holding every turn that has been migrated to the retrieval index, in
//! migration order. `[]` is the valid empty state; the file is created on
//! first record. Loads never fail: absent, empty, and unparsable files all
//! read as empty so a damaged ledger can only cause re-migration, never a
//! crash or data loss.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};
use windlass_core::canonical;
use windlass_core::error::StorageError;
use windlass_core::turn::{SessionId, Turn};

/// Per-session ledger of offloaded turns.
pub struct OffloadLedger {
    root: PathBuf,
}

impl OffloadLedger {
    /// Create a ledger rooted at `<data_dir>/ledger`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into().join("ledger"),
        }
    }

    fn ledger_path(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(format!("{session_id}.json"))
    }

    /// Load a session's ledger. Never fails; absent or damaged files read
    /// as empty.
    pub fn load(&self, session_id: &SessionId) -> Vec<Turn> {
        let path = self.ledger_path(session_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ledger unreadable, treating as empty");
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<Turn>>(&content) {
            Ok(turns) => turns,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ledger unparsable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append a migrated chunk to the persisted sequence. The caller's
    /// chunk is left untouched.
    pub fn record(&self, session_id: &SessionId, chunk: &[Turn]) -> Result<(), StorageError> {
        let existing = self.load(session_id);
        let updated = canonical::append(&existing, chunk);

        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::Write {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        let content = serde_json::to_string_pretty(&updated)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let path = self.ledger_path(session_id);
        std::fs::write(&path, content).map_err(|e| StorageError::Write {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(session = %session_id, recorded = chunk.len(), total = updated.len(), "Ledger updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use windlass_core::turn::Role;

    fn turn(content: &str, ts: &str) -> Turn {
        Turn::with_timestamp(Role::User, content, ts)
    }

    #[test]
    fn absent_ledger_loads_empty() {
        let dir = tempdir().unwrap();
        let ledger = OffloadLedger::new(dir.path());
        assert!(ledger.load(&SessionId::from("fresh")).is_empty());
    }

    #[test]
    fn record_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let ledger = OffloadLedger::new(dir.path());
        let session = SessionId::from("s1");

        let chunk = vec![turn("one", "t1"), turn("two", "t2")];
        ledger.record(&session, &chunk).unwrap();

        let loaded = ledger.load(&session);
        assert_eq!(loaded, chunk);
    }

    #[test]
    fn record_appends_in_order() {
        let dir = tempdir().unwrap();
        let ledger = OffloadLedger::new(dir.path());
        let session = SessionId::from("s1");

        ledger.record(&session, &[turn("one", "t1")]).unwrap();
        ledger.record(&session, &[turn("two", "t2"), turn("three", "t3")]).unwrap();

        let loaded = ledger.load(&session);
        let contents: Vec<&str> = loaded.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn sessions_have_separate_ledgers() {
        let dir = tempdir().unwrap();
        let ledger = OffloadLedger::new(dir.path());

        ledger.record(&SessionId::from("a"), &[turn("from a", "t1")]).unwrap();
        ledger.record(&SessionId::from("b"), &[turn("from b", "t2")]).unwrap();

        assert_eq!(ledger.load(&SessionId::from("a")).len(), 1);
        assert_eq!(ledger.load(&SessionId::from("b")).len(), 1);
        assert_eq!(ledger.load(&SessionId::from("a"))[0].content, "from a");
    }

    #[test]
    fn corrupt_ledger_loads_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("ledger");
        std::fs::create_dir_all(&root).unwrap();
        let mut file = std::fs::File::create(root.join("bad.json")).unwrap();
        writeln!(file, "{{ definitely not a turn list").unwrap();

        let ledger = OffloadLedger::new(dir.path());
        assert!(ledger.load(&SessionId::from("bad")).is_empty());
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("ledger");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::File::create(root.join("empty.json")).unwrap();

        let ledger = OffloadLedger::new(dir.path());
        assert!(ledger.load(&SessionId::from("empty")).is_empty());
    }
}
