//! Chunk text normalization.
//!
//! Raw transcript chunks carry artifacts that are useless as retrieval
//! targets: empty spans, fragments shorter than a phrase, and timestamp-only
//! or symbol-only lines. Normalization drops those before embedding.

use super::Chunk;
use crate::config::NormalizeSettings;

/// Outcome of normalizing a single chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    /// The chunk passed, with its text trimmed.
    Accepted(Chunk),
    /// The chunk was dropped; the reason is for reporting only.
    Discarded(&'static str),
}

/// Validate and clean one chunk. Accepted text is trimmed but otherwise
/// unmodified.
pub fn normalize(mut chunk: Chunk, policy: &NormalizeSettings) -> NormalizeOutcome {
    let trimmed = chunk.text.trim();

    if trimmed.is_empty() {
        return NormalizeOutcome::Discarded("empty text");
    }
    if trimmed.chars().count() < policy.min_chars {
        return NormalizeOutcome::Discarded("text too short");
    }
    if policy.require_alphabetic && !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return NormalizeOutcome::Discarded("no alphabetic characters");
    }

    chunk.text = trimmed.to_string();
    NormalizeOutcome::Accepted(chunk)
}
