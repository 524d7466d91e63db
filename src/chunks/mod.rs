//! Transcript chunk model and chunk-file loading.
//!
//! Upstream transcription tooling produces one JSON file per lecture:
//! `{ "chunks": [{number, title, start, end, text}, ...], "text": "..." }`.
//! Lectern treats those files as its input; it never produces them.

mod normalize;

pub use normalize::{normalize, NormalizeOutcome};

use crate::error::{LecternError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A time offset as it appears in a chunk file.
///
/// Upstream tools emit either raw seconds (speech-to-text output) or a
/// preformatted `mm:ss` string (subtitle conversion). Both forms are carried
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeMark {
    Seconds(f64),
    Clock(String),
}

impl std::fmt::Display for TimeMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeMark::Seconds(s) => {
                let total_seconds = *s as u32;
                let hours = total_seconds / 3600;
                let minutes = (total_seconds % 3600) / 60;
                let secs = total_seconds % 60;

                if hours > 0 {
                    write!(f, "{:02}:{:02}:{:02}", hours, minutes, secs)
                } else {
                    write!(f, "{:02}:{:02}", minutes, secs)
                }
            }
            TimeMark::Clock(c) => write!(f, "{}", c),
        }
    }
}

/// One timestamped span of transcript text with lecture metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// File name of the originating transcript.
    #[serde(default)]
    pub source_file: String,
    /// Lecture number (may be empty).
    #[serde(default)]
    pub number: String,
    /// Lecture title (may be empty).
    #[serde(default)]
    pub title: String,
    /// Start offset within the lecture.
    pub start: TimeMark,
    /// End offset within the lecture.
    pub end: TimeMark,
    /// Spoken text for this span.
    pub text: String,
}

/// One parsed chunk file: the per-span chunks plus the concatenated lecture text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFile {
    pub chunks: Vec<Chunk>,
    /// Full lecture text. Kept for export/debugging; not embedded.
    #[serde(default)]
    pub text: String,
}

impl ChunkFile {
    /// Load a chunk file, stamping each chunk with its source file name.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut file: ChunkFile = serde_json::from_str(&content).map_err(|e| {
            LecternError::ChunkFile(format!("{}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        for chunk in &mut file.chunks {
            chunk.source_file = name.clone();
        }

        Ok(file)
    }
}

/// List the chunk files in a directory, sorted by file name.
///
/// Sorted so repeated ingestion runs over the same inputs enumerate chunks
/// in the same order.
pub fn list_chunk_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Err(LecternError::InvalidInput(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut files: Vec<std::path::PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timemark_accepts_both_forms() {
        let seconds: TimeMark = serde_json::from_str("12.5").unwrap();
        assert_eq!(seconds, TimeMark::Seconds(12.5));

        let clock: TimeMark = serde_json::from_str("\"03:45\"").unwrap();
        assert_eq!(clock, TimeMark::Clock("03:45".to_string()));
    }

    #[test]
    fn test_timemark_roundtrip_preserves_form() {
        let seconds = TimeMark::Seconds(125.0);
        assert_eq!(serde_json::to_string(&seconds).unwrap(), "125.0");

        let clock = TimeMark::Clock("02:05".to_string());
        assert_eq!(serde_json::to_string(&clock).unwrap(), "\"02:05\"");
    }

    #[test]
    fn test_timemark_display() {
        assert_eq!(TimeMark::Seconds(125.0).to_string(), "02:05");
        assert_eq!(TimeMark::Seconds(3725.0).to_string(), "01:02:05");
        assert_eq!(TimeMark::Clock("07:30".to_string()).to_string(), "07:30");
    }

    #[test]
    fn test_chunk_file_parse() {
        let json = r#"{
            "chunks": [
                {"number": "1", "title": "Intro", "start": 0.0, "end": 4.2, "text": "Welcome to the course."}
            ],
            "text": "Welcome to the course."
        }"#;
        let file: ChunkFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.chunks.len(), 1);
        assert_eq!(file.chunks[0].title, "Intro");
        assert_eq!(file.chunks[0].start, TimeMark::Seconds(0.0));
    }

    #[test]
    fn test_list_chunk_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt", "c.json"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }

        let files = list_chunk_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.json"]);
    }
}
