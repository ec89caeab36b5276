//! Error types for the Windlass domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for all Windlass operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Retrieval index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the conversation store or ledger files. Reads degrade to
/// empty sequences at the call site; writes are logged and skipped.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to serialize state: {0}")]
    Serialize(String),
}

/// Failures of the retrieval index. A failed insert during chunk migration
/// must leave the ledger untouched.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Index unavailable: {0}")]
    Unavailable(String),

    #[error("Insert failed: {0}")]
    InsertFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Failures of the external generation backend.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}
