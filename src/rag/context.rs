//! Context assembly for answer generation.
//!
//! Ranked chunks are projected down to the fields the generator should see
//! and serialized into the instruction template. Internal fields (source
//! file, chunk id, embedding, score) never reach the prompt.

use crate::chunks::TimeMark;
use crate::config::Prompts;
use crate::error::Result;
use crate::retrieval::ScoredChunk;
use serde::Serialize;
use std::collections::HashMap;

/// The projection of a ranked chunk shown to the generator.
#[derive(Debug, Clone, Serialize)]
pub struct ContextRecord {
    pub title: String,
    pub number: String,
    pub start: TimeMark,
    pub end: TimeMark,
    pub text: String,
}

impl From<&ScoredChunk> for ContextRecord {
    fn from(scored: &ScoredChunk) -> Self {
        Self {
            title: scored.chunk.title.clone(),
            number: scored.chunk.number.clone(),
            start: scored.chunk.start.clone(),
            end: scored.chunk.end.clone(),
            text: scored.chunk.text.clone(),
        }
    }
}

/// Serialize ranked chunks as a JSON record list, preserving rank order.
pub fn format_lecture_data(ranked: &[ScoredChunk]) -> Result<String> {
    let records: Vec<ContextRecord> = ranked.iter().map(ContextRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Build the full prompt for a question.
///
/// An empty ranked list still yields a well-formed prompt: the lecture-data
/// slot carries an explicit no-data notice instead of an empty block.
pub fn assemble(question: &str, ranked: &[ScoredChunk], prompts: &Prompts) -> Result<String> {
    let lecture_data = if ranked.is_empty() {
        prompts.query.no_data_notice.clone()
    } else {
        format_lecture_data(ranked)?
    };

    let mut vars = HashMap::new();
    vars.insert("lecture_data".to_string(), lecture_data);
    vars.insert("question".to_string(), question.to_string());

    Ok(prompts.render_with_custom(&prompts.query.template, &vars))
}
