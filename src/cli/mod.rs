//! CLI module for Lectern.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lectern - Lecture Transcript Question Answering
///
/// A local-first CLI tool for building a searchable corpus from lecture
/// transcripts and answering questions about them with cited timestamps.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Lectern and write a default configuration
    Init,

    /// Ingest a directory of transcript chunk files into the corpus
    Ingest {
        /// Directory containing chunk JSON files
        chunks_dir: String,

        /// Batch size for embedding requests
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Ask a question and get an answer with lecture citations
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of context chunks to include
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Search the corpus for relevant lecture segments
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List lectures present in the corpus
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
