//! Ollama generation implementation.

use super::Generator;
use crate::error::{LecternError, Result};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Ollama-based generator.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
}

impl OllamaGenerator {
    /// Create a new generator for the given model.
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse = self.client.post_generate(&request).await?;

        // The contract says the answer lives under "response"; anything else
        // is a protocol failure, never defaulted.
        let answer = response.response.ok_or_else(|| {
            LecternError::MalformedResponse(
                "generate response carries no 'response' field".to_string(),
            )
        })?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
