//! Lectern - Lecture Transcript Question Answering
//!
//! A local-first CLI tool for building a searchable corpus from lecture
//! transcripts and answering questions about them with cited timestamps.
//!
//! # Overview
//!
//! Lectern allows you to:
//! - Ingest timestamped transcript chunk files produced by upstream
//!   transcription tooling
//! - Embed them via a local Ollama server into a persisted corpus
//! - Ask questions and get answers citing lecture number and timestamp
//! - Search the corpus semantically
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `chunks` - Transcript chunk model, file loading, and normalization
//! - `embedding` - Embedding generation and batch embedding with fallback
//! - `corpus` - The persisted corpus of embedded chunks
//! - `retrieval` - Cosine-similarity top-K retrieval
//! - `generation` - Answer generation
//! - `rag` - Context assembly and question answering
//! - `orchestrator` - Ingestion pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern::config::Settings;
//! use lectern::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     // Ingest a directory of transcript chunk files
//!     let report = orchestrator.ingest(std::path::Path::new("Chunks")).await?;
//!     println!("Embedded {} chunks", report.chunks_embedded);
//!
//!     Ok(())
//! }
//! ```

pub mod chunks;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ollama;
pub mod orchestrator;
pub mod rag;
pub mod retrieval;

pub use error::{LecternError, Result};
