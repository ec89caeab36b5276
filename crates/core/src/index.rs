//! Retrieval index abstraction.
//!
//! The engine writes migrated conversation chunks to the index and the
//! retrieved-knowledge section reads them back by similarity. Scoring
//! internals are the backend's business; the engine only relies on the
//! result ordering.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Metadata attached to every migrated chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Session the chunk was migrated from
    pub session_id: String,

    /// Migration time, UTC RFC 3339
    pub timestamp: String,
}

/// One retrieval result, best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Relevance score, higher is better
    pub score: f32,

    /// The stored chunk text
    pub text: String,
}

/// Durable similarity store for offloaded conversation text.
#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Store one chunk of text with its metadata.
    async fn insert(&self, text: &str, metadata: ChunkMetadata) -> Result<(), IndexError>;

    /// Return up to `top_k` chunks most relevant to `query`, best first.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>, IndexError>;
}
