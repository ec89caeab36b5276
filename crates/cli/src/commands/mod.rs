//! Subcommand implementations for the `windlass` binary.

use std::sync::Arc;

use windlass_config::AppConfig;
use windlass_core::RetrievalIndex;
use windlass_index::{FileIndex, InMemoryIndex};

pub mod add;
pub mod assemble;
pub mod config_cmd;
pub mod search;
pub mod sessions;
pub mod show;

/// Build the configured retrieval index backend.
pub(crate) fn build_index(config: &AppConfig) -> Arc<dyn RetrievalIndex> {
    if config.retrieval.backend == "memory" {
        Arc::new(InMemoryIndex::new())
    } else {
        Arc::new(FileIndex::new(&config.storage.data_dir))
    }
}
