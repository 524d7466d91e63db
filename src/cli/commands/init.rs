//! Init command - first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Lectern Setup");
    println!();

    // Data directory
    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    // Config file
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    }

    println!();
    println!(
        "Lectern talks to an Ollama server at {}.",
        style(&settings.ollama.base_url).cyan()
    );
    println!(
        "Make sure the embedding model ({}) and generation model ({}) are pulled.",
        style(&settings.embedding.model).cyan(),
        style(&settings.generation.model).cyan()
    );

    println!();
    println!("Next steps:");
    println!(
        "  {} Build the corpus from transcript chunk files",
        style("lectern ingest <chunks-dir>").cyan()
    );
    println!(
        "  {} Ask questions about the lectures",
        style("lectern ask \"<question>\"").cyan()
    );
    println!();
    println!("For more help: {}", style("lectern --help").cyan());

    Ok(())
}
