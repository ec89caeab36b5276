//! # Windlass Core
//!
//! Domain types, traits, and error definitions for the Windlass bounded
//! context assembler. This crate defines the domain model that all other
//! crates implement against.
//!
//! ## Design Philosophy
//!
//! External collaborators (conversation store, retrieval index, text
//! generation) are traits here. Implementations live in their respective
//! crates and are injected as `Arc<dyn Trait>` services. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod canonical;
pub mod error;
pub mod generate;
pub mod index;
pub mod store;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use canonical::{append, canonical_key, difference};
pub use error::{Error, GenerateError, IndexError, Result, StorageError};
pub use generate::Generator;
pub use index::{ChunkMetadata, RetrievalIndex, ScoredChunk};
pub use store::ConversationStore;
pub use turn::{Role, SessionId, Turn, now_local};
