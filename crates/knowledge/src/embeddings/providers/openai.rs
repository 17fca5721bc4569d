//! OpenAI embedding provider.

use crate::embeddings::provider::{EmbeddingProvider, EmbeddingSettings};
use fplscout_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Request payload for the embeddings API
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// Response from the embeddings API
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// Create a new OpenAI embedder from settings.
    pub fn new(settings: EmbeddingSettings, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings
                .endpoint
                .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key: api_key.into(),
            model: settings.model,
            dimensions: settings.dimensions,
        }
    }

    async fn request_embeddings(&self, inputs: Vec<&str>) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        debug!("Sending embedding request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse OpenAI response: {}", e)))?;

        let embeddings: Vec<Vec<f32>> = body.data.into_iter().map(|d| d.embedding).collect();

        for embedding in &embeddings {
            if embedding.len() != self.dimensions {
                return Err(AppError::Embedding(format!(
                    "Unexpected embedding dimensions: got {}, expected {}",
                    embedding.len(),
                    self.dimensions
                )));
            }
        }

        Ok(embeddings)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::Embedding("Cannot embed empty text".to_string()));
        }

        let mut embeddings = self.request_embeddings(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        if let Some(blank) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(AppError::Embedding(format!(
                "Cannot embed empty text at index {}",
                blank
            )));
        }

        // The embeddings API accepts the whole batch in one request
        self.request_embeddings(texts.iter().map(String::as_str).collect())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmbeddingSettings {
        EmbeddingSettings {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            endpoint: None,
        }
    }

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAiEmbedder::new(settings(), "sk-test");
        assert_eq!(embedder.provider_name(), "openai");
        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.dimensions(), 1536);
        assert_eq!(embedder.base_url, DEFAULT_OPENAI_URL);
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let embedder = OpenAiEmbedder::new(settings(), "sk-test");
        let result = embedder.embed(" ").await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_batch_rejects_blank_member() {
        let embedder = OpenAiEmbedder::new(settings(), "sk-test");
        let texts = vec!["fine".to_string(), "".to_string()];
        let result = embedder.embed_batch(&texts).await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }
}
