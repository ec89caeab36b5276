//! Session handoff at startup.
//!
//! When a new session begins, whatever the previous session still held live
//! is rendered as one chunk and moved into the retrieval index, so earlier
//! conversations stay searchable instead of going dark. The previous-session
//! pointer is then moved to the current session either way; a remainder that
//! could not be offloaded stays in its conversation file and out of the
//! ledger, and is offloaded only once that session is active again, by its
//! own paging or by the next handoff away from it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use windlass_core::{canonical, ChunkMetadata, ConversationStore, RetrievalIndex, SessionId};
use windlass_store::{OffloadLedger, PreviousSession};

use crate::transcript::render_transcript;

pub struct SessionHandoff {
    store: Arc<dyn ConversationStore>,
    index: Arc<dyn RetrievalIndex>,
    ledger: OffloadLedger,
    previous: PreviousSession,
}

impl SessionHandoff {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        index: Arc<dyn RetrievalIndex>,
        ledger: OffloadLedger,
        previous: PreviousSession,
    ) -> Self {
        Self {
            store,
            index,
            ledger,
            previous,
        }
    }

    /// Offload the previous session's live remainder, then point the
    /// marker at `current`. Never fails the caller; a session start must
    /// not be blocked by archival problems.
    pub async fn run(&self, current: &SessionId) {
        if let Some(previous) = self.previous.load() {
            if previous != *current {
                self.offload_remainder(&previous).await;
            }
        }

        if let Err(e) = self.previous.store(current) {
            warn!(error = %e, "Failed to update the previous-session pointer");
        }
    }

    async fn offload_remainder(&self, session_id: &SessionId) {
        let turns = match self.store.load(session_id).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(error = %e, "Could not load the previous conversation, leaving it as is");
                return;
            }
        };
        if turns.is_empty() {
            return;
        }

        let offloaded = self.ledger.load(session_id);
        let remainder = canonical::difference(&turns, &offloaded);
        if remainder.is_empty() {
            debug!(session = %session_id, "Previous session already fully offloaded");
            return;
        }

        let rendered = render_transcript(&remainder);
        let metadata = ChunkMetadata {
            session_id: session_id.as_str().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.index.insert(&rendered, metadata).await {
            warn!(error = %e, "Failed to index the previous session's remainder, leaving it live");
            return;
        }

        if let Err(e) = self.ledger.record(session_id, &remainder) {
            warn!(error = %e, "Failed to record the previous session's remainder");
        }
        debug!(
            session = %session_id,
            turns = remainder.len(),
            "Offloaded the previous session's remainder"
        );
    }
}
