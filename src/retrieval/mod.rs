//! Cosine-similarity retrieval over the corpus.
//!
//! A brute-force linear scan: O(corpus_size * dimension) per query, which is
//! fine at the few-thousand-chunk scale this tool targets.

use crate::corpus::{Corpus, EmbeddedChunk};
use crate::embedding::Embedder;
use crate::error::{LecternError, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A corpus record paired with its similarity to the question.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: EmbeddedChunk,
    pub score: f32,
}

/// Embeds questions and ranks corpus records against them.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    /// Create a retriever backed by the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Return the top `k` records by cosine similarity, score descending,
    /// ties broken by ascending chunk id. Empty corpus gives an empty list.
    ///
    /// The corpus must have been built with the configured embedding model;
    /// anything else would produce meaningless scores.
    #[instrument(skip(self, corpus), fields(question = %question, corpus_len = corpus.len()))]
    pub async fn retrieve(
        &self,
        question: &str,
        corpus: &Corpus,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if corpus.embedding_model != self.embedder.model() {
            return Err(LecternError::ModelMismatch {
                corpus: corpus.embedding_model.clone(),
                configured: self.embedder.model().to_string(),
            });
        }

        if corpus.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let question_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| LecternError::Embedding(format!("question embedding failed: {}", e)))?;

        let mut scored: Vec<ScoredChunk> = corpus
            .records
            .iter()
            .map(|record| ScoredChunk {
                score: cosine_similarity(&question_embedding, &record.embedding),
                chunk: record.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.chunk.chunk_id.cmp(&b.chunk.chunk_id))
        });
        scored.truncate(k);

        debug!("Top score: {:.4}", scored.first().map(|s| s.score).unwrap_or(0.0));
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Zero-norm vectors (and length mismatches) score 0.0 by convention.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
