//! Gemini embedding provider (free tier).
//!
//! `POST {base_url}/{model}:embedContent?key=...` with one text per call.
//!
//! ## Security
//!
//! The key travels as a query parameter, so transport errors are stripped
//! of their URL before they become a [`ProviderError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use claimcheck_core::SimilarityTier;

use super::factory::EmbeddingProviderFactory;
use super::secrets::{ApiCredential, CredentialSource, GEMINI_KEY_NAME};
use super::{EmbeddingProvider, ProviderError};
use crate::config::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini `embedContent` client.
pub struct GeminiEmbeddingProvider {
    credential: ApiCredential,
    base_url: String,
    model: String,
    #[cfg(feature = "gemini")]
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbeddingProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiEmbeddingProvider {
    /// Create a provider from a raw key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            GEMINI_KEY_NAME,
        ))
    }

    /// Create a provider from a resolved credential.
    pub fn with_credential(credential: ApiCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_GEMINI_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            #[cfg(feature = "gemini")]
            client: reqwest::Client::new(),
        }
    }

    /// Create from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        ApiCredential::from_env(GEMINI_API_KEY_ENV, GEMINI_KEY_NAME).map(Self::with_credential)
    }

    /// Create from JSON configuration with environment fallback for the key.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            GEMINI_API_KEY_ENV,
            GEMINI_KEY_NAME,
        )?;
        Ok(Self::with_credential(credential).apply_config(config))
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the embedding model, e.g. `models/embedding-001`.
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

    #[cfg_attr(not(feature = "gemini"), allow(dead_code))]
    fn endpoint(&self) -> String {
        format!(
            "{}/{}:embedContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct Part<'a> {
    text: &'a str,
}

#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
impl<'a> EmbedContentRequest<'a> {
    fn new(model: &'a str, text: &'a str) -> Self {
        Self {
            model,
            content: Content {
                parts: vec![Part { text }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
impl EmbedContentResponse {
    fn into_values(self) -> Result<Vec<f32>, ProviderError> {
        match self.embedding {
            Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
            _ => Err(ProviderError::MalformedResponse(
                "embedding.values missing or empty".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    #[cfg(feature = "gemini")]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbedContentRequest::new(&self.model, text);

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.credential.expose())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.without_url().to_string()))?;

        body.into_values()
    }

    #[cfg(not(feature = "gemini"))]
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Gemini provider requires 'gemini' feature".to_string(),
        ))
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Factory for Gemini providers.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "...",                  // Optional, falls back to GEMINI_API_KEY env
///   "base_url": "https://...",         // Optional, custom API endpoint
///   "model": "models/embedding-001"    // Optional
/// }
/// ```
pub struct GeminiEmbeddingProviderFactory;

impl EmbeddingProviderFactory for GeminiEmbeddingProviderFactory {
    fn provider_type(&self) -> &'static str {
        "gemini"
    }

    fn tier(&self) -> SimilarityTier {
        SimilarityTier::GeminiEmbedding
    }

    fn create_with_credential(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let provider = GeminiEmbeddingProvider::with_credential(credential).apply_config(config);
        Ok(Arc::new(provider))
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(GeminiEmbeddingProvider::from_config(config)?))
    }

    fn is_enabled(&self) -> bool {
        cfg!(feature = "gemini")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let provider = GeminiEmbeddingProvider::new("k").with_base_url("https://example.com/v1beta/");
        assert_eq!(
            provider.endpoint(),
            "https://example.com/v1beta/models/embedding-001:embedContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = EmbedContentRequest::new("models/embedding-001", "hello");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "models/embedding-001");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_response_values() {
        let body: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding": {"values": [0.1, 0.2, 0.3]}}"#).unwrap();
        assert_eq!(body.into_values().unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_empty_response_is_malformed() {
        let body: EmbedContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            body.into_values(),
            Err(ProviderError::MalformedResponse(_))
        ));

        let body: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding": {"values": []}}"#).unwrap();
        assert!(body.into_values().is_err());
    }

    #[test]
    fn test_factory_applies_config() {
        let factory = GeminiEmbeddingProviderFactory;
        let config = serde_json::json!({
            "api_key": "test-key",
            "model": "models/text-embedding-004",
        });
        let provider = GeminiEmbeddingProvider::from_config(&config).unwrap();

        assert_eq!(provider.model, "models/text-embedding-004");
        assert_eq!(factory.tier(), SimilarityTier::GeminiEmbedding);
        assert!(factory.create(&config).is_ok());
    }

    #[test]
    fn test_factory_rejects_bad_url() {
        let config = serde_json::json!({
            "api_key": "test-key",
            "base_url": "generativelanguage.googleapis.com",
        });
        assert!(GeminiEmbeddingProviderFactory.create(&config).is_err());
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret_key = "gemini-super-secret-key";
        let provider = GeminiEmbeddingProvider::new(secret_key);
        let debug_output = format!("{:?}", provider);

        assert!(!debug_output.contains(secret_key));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_health_check_requires_key() {
        assert!(GeminiEmbeddingProvider::new("k").health_check().await);
        assert!(!GeminiEmbeddingProvider::new("").health_check().await);
    }

    #[cfg(not(feature = "gemini"))]
    #[tokio::test]
    async fn test_embed_without_feature_is_not_configured() {
        let result = GeminiEmbeddingProvider::new("k").embed("text").await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
