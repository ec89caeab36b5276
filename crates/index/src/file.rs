//! File-based index — persistent JSON-lines storage.
//!
//! Each line is one JSON-encoded [`IndexedChunk`]. Chunks are loaded into
//! memory on creation and flushed to disk on every insert, giving fast
//! queries with durable writes.
//!
//! Storage location: `<data_dir>/index/chunks.jsonl`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use windlass_core::{ChunkMetadata, IndexError, RetrievalIndex, ScoredChunk};

use crate::scoring::{rank_chunks, IndexedChunk};

/// A file-backed index using JSONL (one JSON object per line).
pub struct FileIndex {
    path: PathBuf,
    chunks: Arc<RwLock<Vec<IndexedChunk>>>,
}

impl FileIndex {
    /// Open the index stored under `data_dir`.
    ///
    /// If the chunk file exists, chunks are loaded from it. If it does not,
    /// the index starts empty and the file is created on first insert.
    pub fn new(data_dir: &Path) -> Self {
        let path = data_dir.join("index").join("chunks.jsonl");
        let chunks = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = chunks.len(), "File index loaded");
        Self {
            path,
            chunks: Arc::new(RwLock::new(chunks)),
        }
    }

    fn load_from_disk(path: &Path) -> Vec<IndexedChunk> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<IndexedChunk>(line) {
                Ok(chunk) => Some(chunk),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted index line");
                    None
                }
            })
            .collect()
    }

    /// Flush all chunks to disk as JSONL.
    async fn flush(&self) -> Result<(), IndexError> {
        let chunks = self.chunks.read().await;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                IndexError::InsertFailed(format!("failed to create index directory: {e}"))
            })?;
        }

        let mut content = String::new();
        for chunk in chunks.iter() {
            let line = serde_json::to_string(chunk)
                .map_err(|e| IndexError::InsertFailed(format!("failed to serialize chunk: {e}")))?;
            content.push_str(&line);
            content.push('\n');
        }

        std::fs::write(&self.path, &content)
            .map_err(|e| IndexError::InsertFailed(format!("failed to write index file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl RetrievalIndex for FileIndex {
    fn name(&self) -> &str {
        "file"
    }

    async fn insert(&self, text: &str, metadata: ChunkMetadata) -> Result<(), IndexError> {
        self.chunks.write().await.push(IndexedChunk {
            text: text.to_string(),
            metadata,
        });
        self.flush().await
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        let chunks = self.chunks.read().await;
        Ok(rank_chunks(&chunks, query, top_k))
    }
}
