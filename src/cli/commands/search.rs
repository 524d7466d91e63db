//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::retrieval::Retriever;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings, None) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let corpus = orchestrator.load_corpus()?;

    let retriever = Retriever::new(orchestrator.embedder());

    let spinner = Output::spinner("Searching...");
    let results = retriever.retrieve(query, &corpus, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(ranked) => {
            if ranked.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", ranked.len()));

                for result in &ranked {
                    Output::search_result(
                        &result.chunk.title,
                        &result.chunk.number,
                        &result.chunk.start.to_string(),
                        result.score,
                        &result.chunk.text,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
