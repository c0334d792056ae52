//! Runtime configuration.
//!
//! Loaded from YAML (or JSON); every field is optional and falls back to
//! its default. Durations are human-readable strings ("10s", "1500ms").
//!
//! ```yaml
//! max_statements: 5
//! search:
//!   max_results: 3
//!   timeout: 10s
//! embeddings:
//!   timeout: 15s
//!   gemini:
//!     model: models/embedding-001
//!   openai:
//!     model: text-embedding-3-small
//! ```
//!
//! Credentials are not part of this file; see
//! [`ProviderSettings`](crate::providers::ProviderSettings).

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use claimcheck_core::DEFAULT_MAX_STATEMENTS;

pub const DEFAULT_MAX_RESULTS: usize = 3;
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_SEARCH_URL: &str = "https://api.you.com/v1/search";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "models/embedding-001";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Cap on statements per request.
    pub max_statements: usize,

    pub search: SearchConfig,

    pub embeddings: EmbeddingsConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_statements: DEFAULT_MAX_STATEMENTS,
            search: SearchConfig::default(),
            embeddings: EmbeddingsConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Check value ranges and URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_statements == 0 {
            return Err(invalid("max_statements", "must be at least 1"));
        }
        if self.search.max_results == 0 {
            return Err(invalid("search.max_results", "must be at least 1"));
        }
        if self.search.timeout.is_zero() {
            return Err(invalid("search.timeout", "must be greater than zero"));
        }
        if self.embeddings.timeout.is_zero() {
            return Err(invalid("embeddings.timeout", "must be greater than zero"));
        }

        check_url("search.base_url", &self.search.base_url)?;
        check_url("embeddings.gemini.base_url", &self.embeddings.gemini.base_url)?;
        check_url("embeddings.openai.base_url", &self.embeddings.openai.base_url)?;

        Ok(())
    }
}

/// Evidence lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results requested per statement.
    pub max_results: usize,

    #[serde(with = "duration_str")]
    pub timeout: Duration,

    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_SEARCH_TIMEOUT,
            base_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

/// Embedding tier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// Bound on each embedding call (a batched call counts as one).
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    pub gemini: EmbeddingModelConfig,

    pub openai: EmbeddingModelConfig,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_EMBEDDING_TIMEOUT,
            gemini: EmbeddingModelConfig::new(DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL),
            openai: EmbeddingModelConfig::new(DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL),
        }
    }
}

/// One embedding provider's model and endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingModelConfig {
    pub model: String,
    pub base_url: String,
}

impl EmbeddingModelConfig {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// JSON form accepted by the provider factories. The credential is
    /// left to the factory's environment fallback.
    pub fn to_provider_config(&self) -> JsonValue {
        serde_json::json!({
            "model": self.model,
            "base_url": self.base_url,
        })
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(field, "must start with http:// or https://"))
    }
}

/// Serde adapter for `humantime` duration strings.
mod duration_str {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_statements, 5);
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.search.timeout, Duration::from_secs(10));
        assert_eq!(config.embeddings.timeout, Duration::from_secs(15));
        assert_eq!(config.embeddings.gemini.model, "models/embedding-001");
        assert_eq!(config.embeddings.openai.model, "text-embedding-3-small");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RuntimeConfig::from_yaml(
            r#"
max_statements: 3
search:
  timeout: 2500ms
"#,
        )
        .unwrap();

        assert_eq!(config.max_statements, 3);
        assert_eq!(config.search.timeout, Duration::from_millis(2500));
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.embeddings.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_nested_model_override() {
        let config = RuntimeConfig::from_yaml(
            r#"
embeddings:
  timeout: 1m
  openai:
    model: text-embedding-3-large
    base_url: http://localhost:8080/v1
"#,
        )
        .unwrap();

        assert_eq!(config.embeddings.timeout, Duration::from_secs(60));
        assert_eq!(config.embeddings.openai.model, "text-embedding-3-large");
        assert_eq!(config.embeddings.gemini.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_json_config() {
        let config = RuntimeConfig::from_json(r#"{"search": {"max_results": 5}}"#).unwrap();
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn test_bad_duration_is_error() {
        let result = RuntimeConfig::from_yaml("search:\n  timeout: soon\n");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_zero_values_rejected() {
        let result = RuntimeConfig::from_yaml("max_statements: 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "max_statements",
                ..
            })
        ));

        let result = RuntimeConfig::from_yaml("search:\n  timeout: 0s\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = RuntimeConfig::from_yaml("search:\n  base_url: api.you.com\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("search.base_url"));
    }

    #[test]
    fn test_duration_serializes_human_readable() {
        let yaml = serde_yaml::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("timeout: 10s"));
        assert!(yaml.contains("timeout: 15s"));
    }

    #[test]
    fn test_provider_config_json() {
        let json = EmbeddingModelConfig::new("m", "https://x").to_provider_config();
        assert_eq!(json["model"], "m");
        assert_eq!(json["base_url"], "https://x");
        assert!(json.get("api_key").is_none());
    }
}
