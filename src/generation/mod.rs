//! Answer generation.

mod ollama;

pub use ollama::OllamaGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for answer generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the prompt and return the raw answer text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
