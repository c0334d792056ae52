//! Health report: which credentials are present and which similarity tier
//! a validation run would prefer.
//!
//! The service is `healthy` when the search credential is set; embedding
//! credentials are optional since lexical scoring always works.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::providers::ProviderSettings;

/// Overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Credential presence and preferred similarity method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,

    /// "set" or "missing"
    pub gemini_api_key: String,

    /// "set" or "missing"
    pub openai_api_key: String,

    /// "set" or "missing (required)"
    pub you_api_key: String,

    /// Label of the preferred similarity tier.
    pub similarity_method: String,
}

impl HealthReport {
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        let status = if settings.has_search() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        Self {
            status,
            gemini_api_key: presence(settings.gemini().is_some(), "missing"),
            openai_api_key: presence(settings.openai().is_some(), "missing"),
            you_api_key: presence(settings.has_search(), "missing (required)"),
            similarity_method: settings.preferred_tier().label().to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

fn presence(set: bool, missing: &str) -> String {
    if set { "set" } else { missing }.to_string()
}
