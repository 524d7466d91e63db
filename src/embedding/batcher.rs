//! Batch embedding with per-item fallback.
//!
//! Batch requests are far cheaper per item, but a single bad item would
//! otherwise discard the whole batch. When a batch call fails (or comes back
//! with the wrong vector count), each item is retried individually so only
//! the bad items are lost.

use super::Embedder;
use crate::chunks::Chunk;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Why one chunk could not be embedded. Expected degradation, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedFailure {
    pub reason: String,
}

/// Per-chunk outcome of a batch embedding run.
pub type EmbedOutcome = (Chunk, std::result::Result<Vec<f32>, EmbedFailure>);

/// Groups chunks into fixed-size batches and embeds them, degrading to
/// sequential per-item calls when a batch request fails.
pub struct EmbeddingBatcher {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    pacing: Duration,
}

impl EmbeddingBatcher {
    /// Create a batcher. `pacing` is the delay between per-item fallback
    /// calls, to avoid hammering the embedding service.
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, pacing: Duration) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
            pacing,
        }
    }

    /// Embed all chunks, preserving input order. Every input chunk appears in
    /// the output exactly once, paired with its vector or a failure.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn embed_all(&self, chunks: Vec<Chunk>) -> Vec<EmbedOutcome> {
        let mut outcomes = Vec::with_capacity(chunks.len());

        let mut remaining = chunks;
        while !remaining.is_empty() {
            let rest = remaining.split_off(remaining.len().min(self.batch_size));
            let batch = std::mem::replace(&mut remaining, rest);
            outcomes.extend(self.embed_batch(batch).await);
        }

        outcomes
    }

    async fn embed_batch(&self, batch: Vec<Chunk>) -> Vec<EmbedOutcome> {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

        match self.embedder.embed_batch(&texts).await {
            // Vectors pair positionally with inputs; the count check guards
            // against a truncated response silently shifting the pairing.
            Ok(vectors) if vectors.len() == batch.len() => {
                debug!("Batch of {} embedded in one call", batch.len());
                batch.into_iter().zip(vectors.into_iter().map(Ok)).collect()
            }
            Ok(vectors) => {
                warn!(
                    "Batch returned {} vectors for {} inputs, retrying per item",
                    vectors.len(),
                    batch.len()
                );
                self.embed_singly(batch).await
            }
            Err(e) => {
                warn!("Batch embedding failed ({}), retrying per item", e);
                self.embed_singly(batch).await
            }
        }
    }

    /// One-shot per-item fallback. No backoff, no retry queue; an item that
    /// fails here is reported as a failure and dropped by the caller.
    async fn embed_singly(&self, batch: Vec<Chunk>) -> Vec<EmbedOutcome> {
        let mut outcomes = Vec::with_capacity(batch.len());

        for chunk in batch {
            let outcome = match self.embedder.embed(&chunk.text).await {
                Ok(vector) => Ok(vector),
                Err(e) => Err(EmbedFailure {
                    reason: e.to_string(),
                }),
            };
            outcomes.push((chunk, outcome));

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        outcomes
    }
}
