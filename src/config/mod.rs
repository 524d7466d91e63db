//! Configuration module for Lectern.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QueryPrompts};
pub use settings::{
    CorpusSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, NormalizeSettings,
    OllamaSettings, PromptSettings, RetrievalSettings, Settings,
};
