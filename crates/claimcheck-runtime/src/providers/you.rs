//! You.com web search provider.
//!
//! `GET {base_url}?query=...&num_web_results=N` with an `X-API-Key` header.
//! Results are read from `web.results[]`; any non-success status is an
//! error.

use async_trait::async_trait;
use serde::Deserialize;

use claimcheck_core::EvidenceItem;

use super::secrets::{ApiCredential, CredentialSource, YOU_KEY_NAME};
use super::{ProviderError, SearchProvider};
use crate::config::DEFAULT_SEARCH_URL;

/// Environment variable name for the You.com API key.
pub const YOU_API_KEY_ENV: &str = "YOU_API_KEY";

/// You.com search client.
pub struct YouSearchProvider {
    credential: ApiCredential,
    base_url: String,
    #[cfg(feature = "you")]
    client: reqwest::Client,
}

impl std::fmt::Debug for YouSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouSearchProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YouSearchProvider {
    /// Create a provider from a raw key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            YOU_KEY_NAME,
        ))
    }

    /// Create a provider from a resolved credential.
    pub fn with_credential(credential: ApiCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_SEARCH_URL.to_string(),
            #[cfg(feature = "you")]
            client: reqwest::Client::new(),
        }
    }

    /// Create from `YOU_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        ApiCredential::from_env(YOU_API_KEY_ENV, YOU_KEY_NAME).map(Self::with_credential)
    }

    /// Set custom search endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(not(feature = "you"), allow(dead_code))]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(not(feature = "you"), allow(dead_code))]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "you"), allow(dead_code))]
struct WebResult {
    title: Option<String>,
    snippet: Option<String>,
    url: Option<String>,
}

#[cfg_attr(not(feature = "you"), allow(dead_code))]
impl SearchResponse {
    fn into_evidence(self, max_results: usize) -> Vec<EvidenceItem> {
        self.web
            .unwrap_or_default()
            .results
            .into_iter()
            .take(max_results)
            .map(|result| EvidenceItem {
                title: result.title,
                snippet: result.snippet,
                url: result.url,
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for YouSearchProvider {
    #[cfg(feature = "you")]
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<EvidenceItem>, ProviderError> {
        let count = max_results.to_string();

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .get(&self.base_url)
            .header("X-API-Key", self.credential.expose())
            .query(&[("query", query), ("num_web_results", count.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.into_evidence(max_results))
    }

    #[cfg(not(feature = "you"))]
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<EvidenceItem>, ProviderError> {
        Err(ProviderError::NotConfigured(
            "You.com provider requires 'you' feature".to_string(),
        ))
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "you"
    }
}
