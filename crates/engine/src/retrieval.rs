//! Retrieved-knowledge section rendering.

use tracing::{debug, warn};
use windlass_core::{RetrievalIndex, Role, Turn};

/// Render the retrieved-knowledge section for a conversation.
///
/// Queries the index with the content of the last user turn and renders
/// numbered result blocks separated by `---` rules. Any failure — no user
/// turn yet, an index error, no results — yields an empty string, so the
/// allocator skips the section instead of rendering a husk.
pub async fn render_retrieved_knowledge(
    index: &dyn RetrievalIndex,
    turns: &[Turn],
    top_k: usize,
) -> String {
    let Some(last_user) = turns.iter().rev().find(|t| t.role == Role::User) else {
        debug!("No user turn to query with, skipping retrieval");
        return String::new();
    };

    let results = match index.retrieve(&last_user.content, top_k).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, "Retrieval failed, rendering nothing");
            return String::new();
        }
    };

    if results.is_empty() {
        debug!("No retrieval results for the current query");
        return String::new();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] {}", i + 1, r.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use windlass_core::{ChunkMetadata, IndexError, ScoredChunk};
    use windlass_index::InMemoryIndex;

    struct FailingIndex;

    #[async_trait]
    impl RetrievalIndex for FailingIndex {
        fn name(&self) -> &str {
            "failing"
        }

        async fn insert(&self, _text: &str, _metadata: ChunkMetadata) -> Result<(), IndexError> {
            Err(IndexError::Unavailable("index offline".into()))
        }

        async fn retrieve(
            &self,
            _query: &str,
            _top_k: usize,
        ) -> Result<Vec<ScoredChunk>, IndexError> {
            Err(IndexError::QueryFailed("index offline".into()))
        }
    }

    fn meta() -> ChunkMetadata {
        ChunkMetadata {
            session_id: "s1".into(),
            timestamp: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn renders_numbered_blocks() {
        let index = InMemoryIndex::new();
        index
            .insert("we discussed tokio runtimes", meta())
            .await
            .unwrap();
        index
            .insert("tokio spawn and join handles", meta())
            .await
            .unwrap();

        let turns = vec![Turn::user("tell me about tokio")];
        let out = render_retrieved_knowledge(&index, &turns, 5).await;

        assert!(out.starts_with("[1] "));
        assert!(out.contains("\n\n---\n\n[2] "));
    }

    #[tokio::test]
    async fn queries_with_last_user_turn() {
        let index = InMemoryIndex::new();
        index.insert("notes about apples", meta()).await.unwrap();
        index.insert("notes about pears", meta()).await.unwrap();

        let turns = vec![
            Turn::user("pears please"),
            Turn::assistant("sure"),
            Turn::user("actually apples"),
        ];
        let out = render_retrieved_knowledge(&index, &turns, 5).await;
        assert!(out.contains("apples"));
        assert!(!out.contains("pears"));
    }

    #[tokio::test]
    async fn no_user_turn_yields_empty() {
        let index = InMemoryIndex::new();
        index.insert("something stored", meta()).await.unwrap();

        let turns = vec![Turn::assistant("hello, how can I help?")];
        assert_eq!(render_retrieved_knowledge(&index, &turns, 5).await, "");
    }

    #[tokio::test]
    async fn no_results_yields_empty() {
        let index = InMemoryIndex::new();
        let turns = vec![Turn::user("anything indexed?")];
        assert_eq!(render_retrieved_knowledge(&index, &turns, 5).await, "");
    }

    #[tokio::test]
    async fn index_error_yields_empty() {
        let turns = vec![Turn::user("a question")];
        assert_eq!(render_retrieved_knowledge(&FailingIndex, &turns, 5).await, "");
    }
}
