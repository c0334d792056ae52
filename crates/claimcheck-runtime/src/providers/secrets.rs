//! Credential handling for search and embedding providers.
//!
//! - **No accidental logging**: credentials never appear in Debug/Display output
//! - **Zeroed on drop**: values live in a `secrecy::SecretString`
//! - **Explicit exposure**: call `.expose()` only where the value is sent
//!
//! Credentials are resolved once, at startup, into a [`ProviderSettings`].
//! Nothing downstream reads the environment again.
//!
//! ## Usage
//!
//! ```ignore
//! use claimcheck_runtime::providers::{ApiCredential, ProviderSettings};
//!
//! // Resolve all three keys from the environment
//! let settings = ProviderSettings::from_env();
//!
//! // Or a single key from config with env fallback
//! let cred = ApiCredential::from_config_or_env(&config, "api_key", "OPENAI_API_KEY", "OpenAI API key")?;
//!
//! // Use in HTTP header (explicit exposure)
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use claimcheck_core::SimilarityTier;

use super::{ProviderError, GEMINI_API_KEY_ENV, OPENAI_API_KEY_ENV, YOU_API_KEY_ENV};
use crate::health::HealthReport;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from configuration file/JSON
    Config,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// Debug and Display show `[REDACTED]` in place of the value.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a value. It cannot be logged after this point.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load credential from an environment variable.
    ///
    /// An unset or empty variable is an error.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        Self::optional_from_env(env_var, name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "{} not set: configure '{}' environment variable",
                name, env_var
            ))
        })
    }

    /// Load credential from an environment variable if it is set and
    /// non-empty.
    pub fn optional_from_env(env_var: &str, name: &'static str) -> Option<Self> {
        std::env::var(env_var)
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| Self::new(value, CredentialSource::Environment, name))
    }

    /// Load credential from JSON config, falling back to an environment
    /// variable. Empty strings count as missing in both places.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config[config_key].as_str().filter(|v| !v.is_empty()) {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        Self::optional_from_env(env_var, name).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "{} required: set '{}' in config or {} environment variable",
                name, config_key, env_var
            ))
        })
    }

    /// Check if a credential is available (without loading it).
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config[config_key].as_str().is_some_and(|v| !v.is_empty())
            || std::env::var(env_var).is_ok_and(|v| !v.is_empty())
    }

    /// Expose the credential value for use in an API call.
    ///
    /// Call this only where the value is sent. Never store the result.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Check if the credential is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Get the source of this credential.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Get the human-readable name of this credential.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Clone for ApiCredential {
    fn clone(&self) -> Self {
        Self::new(self.expose(), self.source, self.name)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

pub const YOU_KEY_NAME: &str = "You.com API key";
pub const GEMINI_KEY_NAME: &str = "Gemini API key";
pub const OPENAI_KEY_NAME: &str = "OpenAI API key";

/// The credentials a validation run may use, resolved once.
///
/// The search key is mandatory for validation; both embedding keys are
/// optional and only decide which similarity tier is preferred.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    search: Option<ApiCredential>,
    gemini: Option<ApiCredential>,
    openai: Option<ApiCredential>,
}

impl ProviderSettings {
    /// Settings with no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `YOU_API_KEY`, `GEMINI_API_KEY` and `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            search: ApiCredential::optional_from_env(YOU_API_KEY_ENV, YOU_KEY_NAME),
            gemini: ApiCredential::optional_from_env(GEMINI_API_KEY_ENV, GEMINI_KEY_NAME),
            openai: ApiCredential::optional_from_env(OPENAI_API_KEY_ENV, OPENAI_KEY_NAME),
        }
    }

    /// Set the search key. An empty key clears it.
    pub fn with_search_key(mut self, key: impl Into<String>) -> Self {
        self.search = programmatic(key.into(), YOU_KEY_NAME);
        self
    }

    /// Set the Gemini key. An empty key clears it.
    pub fn with_gemini_key(mut self, key: impl Into<String>) -> Self {
        self.gemini = programmatic(key.into(), GEMINI_KEY_NAME);
        self
    }

    /// Set the OpenAI key. An empty key clears it.
    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai = programmatic(key.into(), OPENAI_KEY_NAME);
        self
    }

    pub fn search(&self) -> Option<&ApiCredential> {
        self.search.as_ref()
    }

    pub fn gemini(&self) -> Option<&ApiCredential> {
        self.gemini.as_ref()
    }

    pub fn openai(&self) -> Option<&ApiCredential> {
        self.openai.as_ref()
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// The tier a fully working scorer would use: Gemini if its key is
    /// present, then OpenAI, then lexical.
    pub fn preferred_tier(&self) -> SimilarityTier {
        if self.gemini.is_some() {
            SimilarityTier::GeminiEmbedding
        } else if self.openai.is_some() {
            SimilarityTier::OpenAiEmbedding
        } else {
            SimilarityTier::Lexical
        }
    }

    /// Summarize credential presence.
    pub fn health_report(&self) -> HealthReport {
        HealthReport::from_settings(self)
    }
}

fn programmatic(key: String, name: &'static str) -> Option<ApiCredential> {
    if key.is_empty() {
        None
    } else {
        Some(ApiCredential::new(key, CredentialSource::Programmatic, name))
    }
}
