//! Ingestion pipeline orchestrator.
//!
//! Coordinates the whole run from chunk files to a persisted corpus:
//! scan, parse, normalize, batch embed, build, save.

use crate::chunks::{self, ChunkFile, NormalizeOutcome};
use crate::config::{Prompts, Settings};
use crate::corpus::{Corpus, CorpusBuilder};
use crate::embedding::{Embedder, EmbeddingBatcher, OllamaEmbedder};
use crate::error::Result;
use crate::generation::{Generator, OllamaGenerator};
use crate::ollama::OllamaClient;
use crate::rag::QueryEngine;
use crate::retrieval::Retriever;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// The main orchestrator for the Lectern pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
}

impl Orchestrator {
    /// Create a new orchestrator with default components from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let client = OllamaClient::new(&settings.ollama);
        let embedder = Arc::new(OllamaEmbedder::new(client.clone(), &settings.embedding.model));
        let generator = Arc::new(OllamaGenerator::new(client, &settings.generation.model));

        Ok(Self {
            settings,
            prompts,
            embedder,
            generator,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            generator,
        }
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build a query engine over the configured components.
    pub fn query_engine(&self) -> QueryEngine {
        QueryEngine::new(
            Retriever::new(self.embedder.clone()),
            self.generator.clone(),
            self.prompts.clone(),
            self.settings.retrieval.top_k,
        )
    }

    /// Load the persisted corpus.
    pub fn load_corpus(&self) -> Result<Corpus> {
        Corpus::load(&self.settings.corpus_path())
    }

    /// Ingest a directory of chunk files and persist the corpus.
    pub async fn ingest(&self, chunks_dir: &Path) -> Result<IngestReport> {
        self.ingest_at(chunks_dir, Utc::now()).await
    }

    /// Ingest with an explicit build timestamp, so identical inputs with a
    /// deterministic embedder persist byte-identical corpora.
    #[instrument(skip(self), fields(dir = %chunks_dir.display()))]
    pub async fn ingest_at(
        &self,
        chunks_dir: &Path,
        built_at: DateTime<Utc>,
    ) -> Result<IngestReport> {
        let files = chunks::list_chunk_files(chunks_dir)?;
        info!("Found {} chunk files", files.len());

        let batcher = EmbeddingBatcher::new(
            self.embedder.clone(),
            self.settings.embedding.batch_size,
            Duration::from_millis(self.settings.embedding.retry_pacing_ms),
        );

        let mut builder = CorpusBuilder::new(self.embedder.model());
        let mut report = IngestReport::new(self.settings.corpus_path());

        for path in files {
            let file = match ChunkFile::load(&path) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report
                        .skipped_files
                        .push((path.display().to_string(), e.to_string()));
                    continue;
                }
            };

            report.files_processed += 1;
            report.chunks_seen += file.chunks.len();

            let mut clean = Vec::new();
            for chunk in file.chunks {
                match chunks::normalize(chunk, &self.settings.normalize) {
                    NormalizeOutcome::Accepted(chunk) => clean.push(chunk),
                    NormalizeOutcome::Discarded(_) => report.chunks_dropped += 1,
                }
            }
            info!("{}: {} valid chunks", path.display(), clean.len());

            for (chunk, outcome) in batcher.embed_all(clean).await {
                match outcome {
                    Ok(embedding) => {
                        builder.push(chunk, embedding)?;
                        report.chunks_embedded += 1;
                    }
                    Err(failure) => {
                        warn!("Embedding failed for a chunk of {}: {}", chunk.source_file, failure.reason);
                        report.chunks_failed += 1;
                        report.failures.push((chunk.source_file, failure.reason));
                    }
                }
            }
        }

        let corpus = builder.build_at(built_at);
        corpus.save(&report.corpus_path)?;
        info!(
            "Ingestion complete: {} chunks embedded, corpus at {}",
            report.chunks_embedded,
            report.corpus_path.display()
        );

        Ok(report)
    }
}

/// Accounting for one ingestion run.
#[derive(Debug)]
pub struct IngestReport {
    /// Where the corpus was written.
    pub corpus_path: PathBuf,
    /// Chunk files parsed successfully.
    pub files_processed: usize,
    /// Files skipped with the reason (unreadable or malformed).
    pub skipped_files: Vec<(String, String)>,
    /// Raw chunks encountered across all files.
    pub chunks_seen: usize,
    /// Chunks rejected by normalization.
    pub chunks_dropped: usize,
    /// Chunks embedded and stored.
    pub chunks_embedded: usize,
    /// Chunks whose embedding failed after fallback.
    pub chunks_failed: usize,
    /// Per-chunk embedding failures (source file, reason).
    pub failures: Vec<(String, String)>,
}

impl IngestReport {
    fn new(corpus_path: PathBuf) -> Self {
        Self {
            corpus_path,
            files_processed: 0,
            skipped_files: Vec::new(),
            chunks_seen: 0,
            chunks_dropped: 0,
            chunks_embedded: 0,
            chunks_failed: 0,
            failures: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LecternError;
    use async_trait::async_trait;
    use chrono::TimeZone;

    /// Deterministic embedder with an optional poisoned text that fails both
    /// in batch (failing the whole batch call) and in fallback.
    struct StubEmbedder {
        poison_text: Option<String>,
    }

    impl StubEmbedder {
        fn vector_for(text: &str) -> Vec<f32> {
            let len = text.len() as f32;
            vec![len, len % 7.0, 1.0]
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if self.poison_text.as_deref() == Some(text) {
                return Err(LecternError::Embedding("poisoned text".to_string()));
            }
            Ok(Self::vector_for(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if let Some(poison) = &self.poison_text {
                if texts.iter().any(|t| t == poison) {
                    return Err(LecternError::Embedding("batch contains poison".to_string()));
                }
            }
            Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    struct NoopGenerator;

    #[async_trait]
    impl Generator for NoopGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("unused".to_string())
        }
    }

    fn write_chunk_file(dir: &Path, name: &str, texts: &[&str]) {
        let chunks: Vec<serde_json::Value> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::json!({
                    "number": "1",
                    "title": "Intro",
                    "start": i as f64 * 5.0,
                    "end": (i + 1) as f64 * 5.0,
                    "text": t,
                })
            })
            .collect();
        let file = serde_json::json!({
            "chunks": chunks,
            "text": texts.join(" "),
        });
        std::fs::write(dir.join(name), serde_json::to_string(&file).unwrap()).unwrap();
    }

    fn orchestrator(corpus_path: &Path, poison: Option<&str>) -> Orchestrator {
        let mut settings = Settings::default();
        settings.corpus.path = corpus_path.display().to_string();
        settings.embedding.retry_pacing_ms = 0;

        Orchestrator::with_components(
            settings,
            Prompts::load(None, None).unwrap(),
            Arc::new(StubEmbedder {
                poison_text: poison.map(|s| s.to_string()),
            }),
            Arc::new(NoopGenerator),
        )
    }

    #[tokio::test]
    async fn test_ingest_drops_bad_chunks_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.json");

        write_chunk_file(
            dir.path().join("chunks").tap_mkdir(),
            "lecture01.json",
            &[
                "a perfectly normal lecture sentence",
                "short",
                "   ",
                "12:34 55:12",
                "another normal lecture sentence here",
            ],
        );

        let orchestrator = orchestrator(&corpus_path, None);
        let report = orchestrator.ingest(&dir.path().join("chunks")).await.unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.chunks_seen, 5);
        assert_eq!(report.chunks_dropped, 3);
        assert_eq!(report.chunks_embedded, 2);
        assert_eq!(report.chunks_failed, 0);

        let corpus = Corpus::load(&corpus_path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.embedding_model, "stub-model");
    }

    #[tokio::test]
    async fn test_ingest_poisoned_item_leaves_contiguous_ids() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.json");
        let chunks_dir = dir.path().join("chunks").tap_mkdir().to_path_buf();

        // One full batch of 8; item index 3 fails even in fallback.
        let texts: Vec<String> = (0..8).map(|i| format!("lecture sentence number {:02}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        write_chunk_file(&chunks_dir, "lecture01.json", &refs);

        let orchestrator = orchestrator(&corpus_path, Some(&texts[3]));
        let report = orchestrator.ingest(&chunks_dir).await.unwrap();

        assert_eq!(report.chunks_embedded, 7);
        assert_eq!(report.chunks_failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "lecture01.json");

        let corpus = Corpus::load(&corpus_path).unwrap();
        assert_eq!(corpus.len(), 7);
        let ids: Vec<u64> = corpus.records.iter().map(|r| r.chunk_id).collect();
        assert_eq!(ids, (0..7).collect::<Vec<u64>>());
        assert!(corpus.records.iter().all(|r| r.text != texts[3]));
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent_with_deterministic_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.json");
        let chunks_dir = dir.path().join("chunks").tap_mkdir().to_path_buf();

        // Two files, created out of name order; sorted scan makes runs agree.
        write_chunk_file(&chunks_dir, "lecture02.json", &["the second lecture talks about actuators"]);
        write_chunk_file(&chunks_dir, "lecture01.json", &["the first lecture talks about sensors"]);

        let orchestrator = orchestrator(&corpus_path, None);
        let built_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        orchestrator.ingest_at(&chunks_dir, built_at).await.unwrap();
        let first = std::fs::read(&corpus_path).unwrap();

        orchestrator.ingest_at(&chunks_dir, built_at).await.unwrap();
        let second = std::fs::read(&corpus_path).unwrap();

        assert_eq!(first, second);

        // File order, then intra-file order
        let corpus = Corpus::load(&corpus_path).unwrap();
        assert_eq!(corpus.records[0].source_file, "lecture01.json");
        assert_eq!(corpus.records[1].source_file, "lecture02.json");
    }

    #[tokio::test]
    async fn test_ingest_skips_malformed_file_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.json");
        let chunks_dir = dir.path().join("chunks").tap_mkdir().to_path_buf();

        std::fs::write(chunks_dir.join("broken.json"), "{not json").unwrap();
        write_chunk_file(&chunks_dir, "lecture01.json", &["a perfectly normal lecture sentence"]);

        let orchestrator = orchestrator(&corpus_path, None);
        let report = orchestrator.ingest(&chunks_dir).await.unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.skipped_files.len(), 1);
        assert!(report.skipped_files[0].0.ends_with("broken.json"));
        assert_eq!(report.chunks_embedded, 1);
    }

    /// Tiny helper so tests can create-and-use a directory inline.
    trait TapMkdir {
        fn tap_mkdir(&self) -> &Path;
    }

    impl TapMkdir for PathBuf {
        fn tap_mkdir(&self) -> &Path {
            std::fs::create_dir_all(self).unwrap();
            self
        }
    }
}
