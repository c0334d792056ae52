//! Provider factory pattern for embedding provider registration.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//!
//! // Credential from config or environment
//! let provider = registry.create("gemini", &config)?;
//!
//! // Credential already resolved into ProviderSettings
//! let provider = registry.create_with_credential("openai", &config, credential)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use claimcheck_core::SimilarityTier;

use super::secrets::ApiCredential;
use super::{EmbeddingProvider, ProviderError};

/// Factory for creating embedding providers from configuration.
pub trait EmbeddingProviderFactory: Send + Sync {
    /// Unique identifier for this provider type, e.g. "gemini".
    fn provider_type(&self) -> &'static str;

    /// The similarity tier providers from this factory serve.
    fn tier(&self) -> SimilarityTier;

    /// Create a provider with a credential resolved elsewhere.
    fn create_with_credential(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError>;

    /// Create a provider, taking the credential from `api_key` in `config`
    /// or from the provider's environment variable.
    fn create(&self, config: &JsonValue) -> Result<Arc<dyn EmbeddingProvider>, ProviderError>;

    /// Validate configuration without creating a provider.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Whether this build can make calls with the providers it creates.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Registry of available embedding provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn EmbeddingProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in Gemini and OpenAI factories.
    ///
    /// Both are always registered; a factory whose HTTP feature is off
    /// refuses to create providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::GeminiEmbeddingProviderFactory));
        registry.register(Arc::new(super::OpenAiEmbeddingProviderFactory));
        registry
    }

    /// Register a provider factory, replacing any with the same type.
    pub fn register(&mut self, factory: Arc<dyn EmbeddingProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Create a provider from type name and configuration.
    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        self.factory(provider_type)?.create(config)
    }

    /// Create a provider with an already-resolved credential.
    pub fn create_with_credential(
        &self,
        provider_type: &str,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        let factory = self.factory(provider_type)?;
        if !factory.is_enabled() {
            return Err(ProviderError::NotConfigured(format!(
                "'{}' provider requires the '{}' feature",
                provider_type, provider_type
            )));
        }
        factory.validate_config(config)?;
        factory.create_with_credential(config, credential)
    }

    /// List available provider types.
    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get the factory for a provider type.
    pub fn get_factory(&self, provider_type: &str) -> Option<&Arc<dyn EmbeddingProviderFactory>> {
        self.factories.get(provider_type)
    }

    fn factory(
        &self,
        provider_type: &str,
    ) -> Result<&Arc<dyn EmbeddingProviderFactory>, ProviderError> {
        self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}
