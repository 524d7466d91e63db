//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::Corpus;
use anyhow::Result;
use std::collections::BTreeMap;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let corpus_path = settings.corpus_path();
    if !corpus_path.is_file() {
        Output::info("No corpus yet. Use 'lectern ingest <chunks-dir>' to build one.");
        return Ok(());
    }

    let corpus = Corpus::load(&corpus_path)?;

    if corpus.is_empty() {
        Output::info("The corpus is empty.");
        return Ok(());
    }

    // Group by source file; keyed on file name so the listing is stable.
    let mut lectures: BTreeMap<String, (String, String, usize)> = BTreeMap::new();
    for record in &corpus.records {
        let entry = lectures
            .entry(record.source_file.clone())
            .or_insert_with(|| (record.title.clone(), record.number.clone(), 0));
        entry.2 += 1;
    }

    Output::header(&format!("Indexed Lectures ({})", lectures.len()));
    println!();

    for (title, number, chunks) in lectures.values() {
        Output::lecture_info(title, number, *chunks);
    }

    println!();
    Output::kv("Embedding model", &corpus.embedding_model);
    Output::kv("Dimensions", &corpus.dimensions.to_string());
    Output::kv("Total chunks", &corpus.len().to_string());
    Output::kv("Built at", &corpus.built_at.to_rfc3339());

    Ok(())
}
