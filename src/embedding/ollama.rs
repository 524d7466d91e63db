//! Ollama embeddings implementation.

use super::Embedder;
use crate::error::{LecternError, Result};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Raw wire response from `/api/embed`.
///
/// Depending on server version and input arity the vectors arrive either
/// under `embeddings` (list of vectors) or singular `embedding` (one vector).
#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    embeddings: Option<Vec<Vec<f32>>>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// Normalize both response shapes into one vector list.
pub fn normalize_embed_response(response: EmbedResponse) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = response.embeddings {
        return Ok(embeddings);
    }
    if let Some(embedding) = response.embedding {
        return Ok(vec![embedding]);
    }
    Err(LecternError::MalformedResponse(
        "embed response carries neither 'embeddings' nor 'embedding'".to_string(),
    ))
}

/// Ollama-based embedder.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new embedder for the given model.
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| LecternError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Requesting embeddings for {} texts", texts.len());

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbedResponse = self.client.post_embed(&request).await?;
        let embeddings = normalize_embed_response(response)?;

        debug!("Received {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
