//! Ollama client configuration with sensible defaults.

use crate::config::OllamaSettings;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Shared HTTP client for a single Ollama server.
///
/// Both the embedder and the generator hold a clone of this; there are no
/// process-wide client singletons.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    embed_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaClient {
    /// Create a client from settings.
    pub fn new(settings: &OllamaSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            embed_timeout: Duration::from_secs(settings.embed_timeout_seconds),
            generate_timeout: Duration::from_secs(settings.generate_timeout_seconds),
        }
    }

    /// POST to `/api/embed` and deserialize the JSON response.
    pub async fn post_embed<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R> {
        self.post("/api/embed", body, self.embed_timeout).await
    }

    /// POST to `/api/generate` and deserialize the JSON response.
    pub async fn post_generate<B: Serialize, R: DeserializeOwned>(&self, body: &B) -> Result<R> {
        self.post("/api/generate", body, self.generate_timeout).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let settings = OllamaSettings {
            base_url: "http://localhost:11434/".to_string(),
            ..OllamaSettings::default()
        };
        let client = OllamaClient::new(&settings);
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
