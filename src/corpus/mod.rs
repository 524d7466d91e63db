//! The embedded-chunk corpus.
//!
//! The corpus is the sole artifact of an ingestion run: an ordered table of
//! embedded chunks, held entirely in memory and persisted as a single JSON
//! blob. It is built once per ingestion, loaded read-only by every query
//! run, and fully replaced by the next ingestion.

use crate::chunks::{Chunk, TimeMark};
use crate::error::{LecternError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A corpus record: a normalized chunk plus its embedding and id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    /// Dense id assigned at insertion, unique within one corpus build.
    pub chunk_id: u64,
    /// File name of the originating transcript.
    pub source_file: String,
    /// Lecture number (may be empty).
    pub number: String,
    /// Lecture title (may be empty).
    pub title: String,
    /// Start offset within the lecture.
    pub start: TimeMark,
    /// End offset within the lecture.
    pub end: TimeMark,
    /// Spoken text for this span.
    pub text: String,
    /// Embedding vector; same length for every record in a corpus.
    pub embedding: Vec<f32>,
}

/// The full embedded corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Model the embeddings were produced with. Validated at query time so a
    /// corpus is never silently scored against vectors from another model.
    pub embedding_model: String,
    /// Embedding dimension, fixed by the first stored record.
    pub dimensions: usize,
    /// When this corpus was built.
    pub built_at: DateTime<Utc>,
    /// Records in insertion order; `chunk_id` equals the index.
    pub records: Vec<EmbeddedChunk>,
}

impl Corpus {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Persist the corpus as a single JSON blob.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a corpus from disk. A zero-record corpus is valid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LecternError::Corpus(format!(
                "cannot read corpus at {}: {}. Run 'lectern ingest' first.",
                path.display(),
                e
            ))
        })?;
        let corpus: Corpus = serde_json::from_str(&content)?;
        Ok(corpus)
    }
}

/// Assembles a corpus from successfully embedded chunks, assigning dense
/// chunk ids in insertion order.
pub struct CorpusBuilder {
    embedding_model: String,
    dimensions: Option<usize>,
    records: Vec<EmbeddedChunk>,
}

impl CorpusBuilder {
    /// Start a build for the given embedding model.
    pub fn new(embedding_model: &str) -> Self {
        Self {
            embedding_model: embedding_model.to_string(),
            dimensions: None,
            records: Vec::new(),
        }
    }

    /// Append one embedded chunk. The first push fixes the corpus dimension;
    /// later vectors of a different length are a hard error.
    pub fn push(&mut self, chunk: Chunk, embedding: Vec<f32>) -> Result<()> {
        let dimensions = *self.dimensions.get_or_insert(embedding.len());
        if embedding.len() != dimensions {
            return Err(LecternError::Corpus(format!(
                "embedding dimension {} does not match corpus dimension {} (chunk from {})",
                embedding.len(),
                dimensions,
                chunk.source_file
            )));
        }

        self.records.push(EmbeddedChunk {
            chunk_id: self.records.len() as u64,
            source_file: chunk.source_file,
            number: chunk.number,
            title: chunk.title,
            start: chunk.start,
            end: chunk.end,
            text: chunk.text,
            embedding,
        });
        Ok(())
    }

    /// Number of records pushed so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the build. `built_at` is injectable so ingestion runs can be
    /// made reproducible in tests.
    pub fn build_at(self, built_at: DateTime<Utc>) -> Corpus {
        Corpus {
            embedding_model: self.embedding_model,
            dimensions: self.dimensions.unwrap_or(0),
            built_at,
            records: self.records,
        }
    }

    /// Finish the build with the current time.
    pub fn build(self) -> Corpus {
        self.build_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            source_file: "lecture01.json".to_string(),
            number: "1".to_string(),
            title: "Intro".to_string(),
            start: TimeMark::Seconds(0.0),
            end: TimeMark::Clock("00:05".to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_builder_assigns_dense_ids() {
        let mut builder = CorpusBuilder::new("stub-model");
        builder.push(chunk("first span of text"), vec![1.0, 0.0]).unwrap();
        builder.push(chunk("second span of text"), vec![0.0, 1.0]).unwrap();
        builder.push(chunk("third span of text"), vec![0.5, 0.5]).unwrap();

        let corpus = builder.build();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.dimensions, 2);
        let ids: Vec<u64> = corpus.records.iter().map(|r| r.chunk_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_builder_rejects_dimension_mismatch() {
        let mut builder = CorpusBuilder::new("stub-model");
        builder.push(chunk("first span of text"), vec![1.0, 0.0]).unwrap();

        let err = builder.push(chunk("bad vector length"), vec![1.0, 0.0, 0.0]);
        assert!(matches!(err, Err(LecternError::Corpus(_))));
    }

    #[test]
    fn test_save_load_roundtrip_exact() {
        let mut builder = CorpusBuilder::new("stub-model");
        // Values chosen to stress float round-tripping
        builder
            .push(chunk("first span of text"), vec![0.1, -0.333333343, 1e-7])
            .unwrap();
        builder
            .push(chunk("second span of text"), vec![f32::MIN_POSITIVE, 0.0, -1.5])
            .unwrap();
        let corpus = builder.build();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        corpus.save(&path).unwrap();

        let loaded = Corpus::load(&path).unwrap();
        assert_eq!(loaded, corpus);
    }

    #[test]
    fn test_empty_corpus_roundtrip() {
        let corpus = CorpusBuilder::new("stub-model").build();
        assert!(corpus.is_empty());
        assert_eq!(corpus.dimensions, 0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        corpus.save(&path).unwrap();

        let loaded = Corpus::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_corpus_error() {
        let err = Corpus::load(Path::new("/nonexistent/corpus.json"));
        assert!(matches!(err, Err(LecternError::Corpus(_))));
    }
}
