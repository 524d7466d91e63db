//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the ingest command.
pub async fn run_ingest(
    chunks_dir: &str,
    batch_size: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    let dir = Path::new(chunks_dir);
    if let Err(e) = preflight::check(Operation::Ingest, &settings, Some(dir)) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(batch_size) = batch_size {
        settings.embedding.batch_size = batch_size;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Embedding chunks...");
    let report = match orchestrator.ingest(dir).await {
        Ok(report) => {
            spinner.finish_and_clear();
            report
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "Ingestion complete: corpus written to {}",
        report.corpus_path.display()
    ));
    Output::kv("Files processed", &report.files_processed.to_string());
    Output::kv("Chunks seen", &report.chunks_seen.to_string());
    Output::kv("Chunks dropped (normalization)", &report.chunks_dropped.to_string());
    Output::kv("Chunks embedded", &report.chunks_embedded.to_string());
    Output::kv("Chunks failed", &report.chunks_failed.to_string());

    if !report.skipped_files.is_empty() {
        Output::header("Skipped files");
        for (file, reason) in &report.skipped_files {
            Output::warning(&format!("{}: {}", file, reason));
        }
    }

    if !report.failures.is_empty() {
        Output::header("Embedding failures");
        for (file, reason) in &report.failures {
            Output::warning(&format!("{}: {}", file, reason));
        }
    }

    Ok(())
}
