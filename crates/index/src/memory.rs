//! In-memory index — useful for testing and ephemeral sessions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use windlass_core::{ChunkMetadata, IndexError, RetrievalIndex, ScoredChunk};

use crate::scoring::{rank_chunks, IndexedChunk};

/// An index that keeps chunks in a Vec. Nothing survives process exit.
pub struct InMemoryIndex {
    chunks: Arc<RwLock<Vec<IndexedChunk>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RetrievalIndex for InMemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, text: &str, metadata: ChunkMetadata) -> Result<(), IndexError> {
        self.chunks.write().await.push(IndexedChunk {
            text: text.to_string(),
            metadata,
        });
        Ok(())
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        let chunks = self.chunks.read().await;
        Ok(rank_chunks(&chunks, query, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ChunkMetadata {
        ChunkMetadata {
            session_id: "s1".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn insert_and_retrieve() {
        let index = InMemoryIndex::new();
        index
            .insert("Rust is a systems language", meta())
            .await
            .unwrap();
        assert_eq!(index.len().await, 1);

        let results = index.retrieve("rust", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].text.contains("Rust"));
    }

    #[tokio::test]
    async fn retrieve_ranks_best_first() {
        let index = InMemoryIndex::new();
        index.insert("tokio tokio tokio", meta()).await.unwrap();
        index
            .insert("tokio mentioned once among many other words here", meta())
            .await
            .unwrap();

        let results = index.retrieve("tokio", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "tokio tokio tokio");
    }

    #[tokio::test]
    async fn retrieve_without_match_is_empty() {
        let index = InMemoryIndex::new();
        index.insert("nothing relevant", meta()).await.unwrap();

        let results = index.retrieve("quasar", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn retrieve_respects_top_k() {
        let index = InMemoryIndex::new();
        for i in 0..10 {
            index
                .insert(&format!("searchable entry {i}"), meta())
                .await
                .unwrap();
        }

        let results = index.retrieve("searchable", 4).await.unwrap();
        assert_eq!(results.len(), 4);
    }
}
