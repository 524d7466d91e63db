//! Pre-flight checks before expensive operations.
//!
//! Validates that required inputs exist before starting operations that
//! would otherwise fail midway.

use crate::config::Settings;
use crate::error::{LecternError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires a readable chunk directory.
    Ingest,
    /// Asking questions requires a built corpus.
    Ask,
    /// Search requires a built corpus.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings, chunks_dir: Option<&Path>) -> Result<()> {
    match operation {
        Operation::Ingest => {
            let dir = chunks_dir.ok_or_else(|| {
                LecternError::InvalidInput("No chunk directory given".to_string())
            })?;
            if !dir.is_dir() {
                return Err(LecternError::InvalidInput(format!(
                    "Chunk directory does not exist: {}",
                    dir.display()
                )));
            }
        }
        Operation::Ask | Operation::Search => {
            check_corpus(settings)?;
        }
    }
    Ok(())
}

/// Check that a corpus has been built.
fn check_corpus(settings: &Settings) -> Result<()> {
    let path = settings.corpus_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(LecternError::Corpus(format!(
            "No corpus found at {}. Run 'lectern ingest <chunks-dir>' first.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_requires_corpus() {
        let mut settings = Settings::default();
        settings.corpus.path = "/nonexistent/corpus.json".to_string();
        assert!(check(Operation::Ask, &settings, None).is_err());
    }

    #[test]
    fn test_ingest_requires_directory() {
        let settings = Settings::default();
        let err = check(Operation::Ingest, &settings, Some(Path::new("/nonexistent")));
        assert!(err.is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(check(Operation::Ingest, &settings, Some(dir.path())).is_ok());
    }
}
