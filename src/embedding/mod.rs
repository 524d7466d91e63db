//! Embedding generation for semantic retrieval.

mod batcher;
mod ollama;

pub use batcher::{EmbedFailure, EmbeddingBatcher};
pub use ollama::{normalize_embed_response, EmbedResponse, OllamaEmbedder};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, one vector per input, in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model, recorded with the corpus.
    fn model(&self) -> &str;
}
