//! Text generation abstraction.
//!
//! The model call itself lives outside this system; the engine only needs
//! "prompt in, text out" for the summarization path.

use async_trait::async_trait;

use crate::error::GenerateError;

/// An external text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
