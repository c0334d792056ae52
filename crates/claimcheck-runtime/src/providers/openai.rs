//! OpenAI embedding provider.
//!
//! `POST {base_url}/embeddings` with bearer auth. Statement and snippet go
//! out together in one batched call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use claimcheck_core::SimilarityTier;

use super::factory::EmbeddingProviderFactory;
use super::secrets::{ApiCredential, CredentialSource, OPENAI_KEY_NAME};
use super::{EmbeddingProvider, ProviderError};
use crate::config::{DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL};

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI embeddings client.
pub struct OpenAiEmbeddingProvider {
    credential: ApiCredential,
    base_url: String,
    model: String,
    #[cfg(feature = "openai")]
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEmbeddingProvider {
    /// Create a provider from a raw key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            OPENAI_KEY_NAME,
        ))
    }

    /// Create a provider from a resolved credential.
    pub fn with_credential(credential: ApiCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            #[cfg(feature = "openai")]
            client: reqwest::Client::new(),
        }
    }

    /// Create from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        ApiCredential::from_env(OPENAI_API_KEY_ENV, OPENAI_KEY_NAME).map(Self::with_credential)
    }

    /// Create from JSON configuration with environment fallback for the key.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            OPENAI_API_KEY_ENV,
            OPENAI_KEY_NAME,
        )?;
        Ok(Self::with_credential(credential).apply_config(config))
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn apply_config(mut self, config: &JsonValue) -> Self {
        if let Some(url) = config["base_url"].as_str() {
            self.base_url = url.to_string();
        }
        if let Some(model) = config["model"].as_str() {
            self.model = model.to_string();
        }
        self
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg_attr(not(feature = "openai"), allow(dead_code))]
impl EmbeddingsResponse {
    /// Vectors in input order. The count must match the request.
    fn into_vectors(mut self, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
        if self.data.len() != expected {
            return Err(ProviderError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                expected,
                self.data.len()
            )));
        }

        self.data.sort_by_key(|d| d.index);
        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embed_batch(&[text])
            .await?
            .pop()
            .ok_or_else(|| ProviderError::MalformedResponse("no embedding returned".to_string()))
    }

    #[cfg(feature = "openai")]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        body.into_vectors(texts.len())
    }

    #[cfg(not(feature = "openai"))]
    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Err(ProviderError::NotConfigured(
            "OpenAI provider requires 'openai' feature".to_string(),
        ))
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for OpenAI providers.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "sk-...",                  // Optional, falls back to OPENAI_API_KEY env
///   "base_url": "https://...",            // Optional, custom API endpoint
///   "model": "text-embedding-3-small"     // Optional
/// }
/// ```
pub struct OpenAiEmbeddingProviderFactory;

impl EmbeddingProviderFactory for OpenAiEmbeddingProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn tier(&self) -> SimilarityTier {
        SimilarityTier::OpenAiEmbedding
    }

    fn create_with_credential(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let provider = OpenAiEmbeddingProvider::with_credential(credential).apply_config(config);
        Ok(Arc::new(provider))
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(OpenAiEmbeddingProvider::from_config(config)?))
    }

    fn is_enabled(&self) -> bool {
        cfg!(feature = "openai")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let input = ["claim", "snippet"];
        let request = EmbeddingsRequest {
            model: "text-embedding-3-small",
            input: &input,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"], serde_json::json!(["claim", "snippet"]));
    }

    #[test]
    fn test_response_reordered_by_index() {
        let body: EmbeddingsResponse = serde_json::from_str(
            r#"{"data": [
                {"embedding": [0.0, 1.0], "index": 1},
                {"embedding": [1.0, 0.0], "index": 0}
            ]}"#,
        )
        .unwrap();

        let vectors = body.into_vectors(2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_response_count_mismatch() {
        let body: EmbeddingsResponse =
            serde_json::from_str(r#"{"data": [{"embedding": [1.0], "index": 0}]}"#).unwrap();
        assert!(matches!(
            body.into_vectors(2),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_factory_enabled_only_with_feature() {
        assert_eq!(
            OpenAiEmbeddingProviderFactory.is_enabled(),
            cfg!(feature = "openai")
        );
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret_key = "sk-openai-super-secret";
        let provider = OpenAiEmbeddingProvider::new(secret_key);
        let debug_output = format!("{:?}", provider);

        assert!(!debug_output.contains(secret_key));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_health_check_requires_key() {
        assert!(OpenAiEmbeddingProvider::new("k").health_check().await);
        assert!(!OpenAiEmbeddingProvider::new("").health_check().await);
    }

    #[cfg(not(feature = "openai"))]
    #[tokio::test]
    async fn test_embed_without_feature_is_not_configured() {
        let result = OpenAiEmbeddingProvider::new("k").embed("text").await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
