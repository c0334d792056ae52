//! Provider abstractions for claimcheck-runtime.
//!
//! Two kinds of outer collaborator sit behind traits here:
//! - [`EmbeddingProvider`]: turns text into a vector (Gemini, OpenAI)
//! - [`SearchProvider`]: returns web evidence for a query (You.com)
//!
//! HTTP implementations are behind the `gemini`, `openai` and `you`
//! features. Without its feature a provider still constructs, but every
//! call returns [`ProviderError::NotConfigured`].
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use claimcheck_core::EvidenceItem;

mod factory;
mod gemini;
mod openai;
pub mod secrets;
mod you;

pub use factory::{EmbeddingProviderFactory, ProviderRegistry};
pub use gemini::{GeminiEmbeddingProvider, GeminiEmbeddingProviderFactory, GEMINI_API_KEY_ENV};
pub use openai::{OpenAiEmbeddingProvider, OpenAiEmbeddingProviderFactory, OPENAI_API_KEY_ENV};
pub use secrets::{ApiCredential, CredentialSource, ProviderSettings};
pub use you::{YouSearchProvider, YOU_API_KEY_ENV};

/// Errors from outer collaborators.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Text embedding backend.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Embed several texts. The result has one vector per input, in input
    /// order.
    ///
    /// The default calls [`embed`](Self::embed) once per text.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Check if provider is usable (credential present).
    async fn health_check(&self) -> bool;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

/// Web search backend used for evidence lookup.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for evidence. Returns at most `max_results` items, in the
    /// provider's ranking order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<EvidenceItem>, ProviderError>;

    /// Check if provider is usable (credential present).
    async fn health_check(&self) -> bool;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingProvider;

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
            if text.is_empty() {
                return Err(ProviderError::MalformedResponse("empty".to_string()));
            }
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_default_batch_preserves_order() {
        let vectors = CountingProvider.embed_batch(&["a", "abc"]).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0, 1.0], vec![3.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_default_batch_stops_on_error() {
        let result = CountingProvider.embed_batch(&["a", ""]).await;
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - unavailable");
        assert!(ProviderError::Timeout(Duration::from_secs(10))
            .to_string()
            .contains("10s"));
    }
}
