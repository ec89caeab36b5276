//! Retrieval index backends for Windlass.
//!
//! Two implementations of the [`windlass_core::RetrievalIndex`] trait: a
//! JSONL-backed [`FileIndex`] for durable storage and an [`InMemoryIndex`]
//! for tests and ephemeral runs. Both rank with the shared keyword scorer
//! in [`scoring`].

pub mod file;
pub mod memory;
pub mod scoring;

pub use file::FileIndex;
pub use memory::InMemoryIndex;
pub use scoring::{rank_chunks, IndexedChunk};
