//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
///
/// The assembled prompt is written to `prompt.txt` before the generation
/// call; `answer.txt` is only written after a successful answer, so a failed
/// generation leaves no answer artifact behind.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    top_k: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings, None) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.generation.model = model;
    }
    if let Some(top_k) = top_k {
        settings.retrieval.top_k = top_k;
    }

    let data_dir = settings.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let orchestrator = Orchestrator::new(settings)?;
    let corpus = orchestrator.load_corpus()?;
    Output::info(&format!("Loaded {} embedded chunks", corpus.len()));

    let engine = orchestrator.query_engine();

    let spinner = Output::spinner("Searching lectures...");
    let prepared = match engine.prepare(question, &corpus).await {
        Ok(prepared) => {
            spinner.finish_and_clear();
            prepared
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Retrieval failed: {}", e));
            return Err(e.into());
        }
    };

    std::fs::write(data_dir.join("prompt.txt"), &prepared.prompt)?;

    let sources = prepared.sources.clone();
    let spinner = Output::spinner("Generating answer...");
    match engine.answer(prepared).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !sources.is_empty() {
                Output::header("Sources");
                for source in &sources {
                    Output::search_result(
                        &source.chunk.title,
                        &source.chunk.number,
                        &source.chunk.start.to_string(),
                        source.score,
                        &source.chunk.text,
                    );
                }
            }

            std::fs::write(data_dir.join("answer.txt"), &response.answer)?;
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
