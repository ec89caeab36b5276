//! Incremental conversation paging.
//!
//! When a conversation outgrows its token ceiling, the pager migrates the
//! oldest turns into the retrieval index, one bounded chunk per assembly
//! pass, and records what moved in the offload ledger. The conversation
//! file itself is never rewritten; the ledger is the only record of what
//! has already been paged out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use windlass_core::{canonical, ChunkMetadata, RetrievalIndex, SessionId, Turn};
use windlass_store::OffloadLedger;

use crate::estimate::estimate_tokens;
use crate::transcript::{keep_oldest_prefix, render_transcript};

pub struct ConversationPager {
    ledger: OffloadLedger,
    index: Arc<dyn RetrievalIndex>,
    chunk_ratio: f64,
    recent_keep: usize,
}

impl ConversationPager {
    pub fn new(
        ledger: OffloadLedger,
        index: Arc<dyn RetrievalIndex>,
        chunk_ratio: f64,
        recent_keep: usize,
    ) -> Self {
        Self {
            ledger,
            index,
            chunk_ratio,
            recent_keep,
        }
    }

    /// Render the live portion of a conversation, paging out at most one
    /// chunk of oldest turns if the transcript exceeds `ceiling` tokens.
    ///
    /// Index and ledger failures degrade to keeping turns live: a chunk
    /// that could not be indexed is returned as part of the transcript,
    /// and a chunk that was indexed but not recorded may be indexed again
    /// on a later pass. Turns are never dropped.
    pub async fn page(&self, turns: &[Turn], session_id: &SessionId, ceiling: usize) -> String {
        let full = render_transcript(turns);
        if estimate_tokens(&full) <= ceiling {
            return full;
        }

        let offloaded = self.ledger.load(session_id);
        let not_yet = canonical::difference(turns, &offloaded);

        let live = render_transcript(&not_yet);
        if estimate_tokens(&live) <= ceiling {
            return live;
        }

        if not_yet.len() <= self.recent_keep {
            debug!(
                turns = not_yet.len(),
                "Conversation over budget but nothing eligible to page out"
            );
            return live;
        }

        let eligible = &not_yet[..not_yet.len() - self.recent_keep];
        let chunk_budget = (ceiling as f64 * self.chunk_ratio).floor() as usize;
        let chunk = keep_oldest_prefix(eligible, chunk_budget);

        if chunk.is_empty() {
            warn!(
                chunk_budget,
                "Oldest turn exceeds the chunk budget, keeping it live"
            );
            return live;
        }

        let rendered = render_transcript(chunk);
        let metadata = ChunkMetadata {
            session_id: session_id.as_str().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.index.insert(&rendered, metadata).await {
            warn!(error = %e, "Failed to index conversation chunk, keeping it live");
            return live;
        }

        if let Err(e) = self.ledger.record(session_id, chunk) {
            warn!(error = %e, "Failed to record offloaded turns, a later pass may index them again");
        }

        debug!(
            session = session_id.as_str(),
            migrated = chunk.len(),
            live = not_yet.len() - chunk.len(),
            "Paged oldest turns into the retrieval index"
        );
        render_transcript(&canonical::difference(&not_yet, chunk))
    }
}
