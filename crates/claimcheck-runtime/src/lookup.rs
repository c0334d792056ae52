//! Evidence lookup: a non-failing wrapper around a [`SearchProvider`].
//!
//! Provider errors and timeouts become an empty result and a warning. The
//! orchestrator treats "no evidence" and "lookup failed" the same way.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use claimcheck_core::EvidenceItem;

use crate::config::SearchConfig;
use crate::providers::{ProviderError, SearchProvider};

/// Bounded, non-failing evidence search.
#[derive(Clone)]
pub struct EvidenceLookup {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    timeout: Duration,
}

impl EvidenceLookup {
    pub fn new(provider: Arc<dyn SearchProvider>, config: &SearchConfig) -> Self {
        Self {
            provider,
            max_results: config.max_results,
            timeout: config.timeout,
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Search for evidence, capped at `max_results`. Never fails.
    pub async fn lookup(&self, statement: &str) -> Vec<EvidenceItem> {
        match self.try_lookup(statement).await {
            Ok(items) => {
                debug!(
                    provider = self.provider.name(),
                    results = items.len(),
                    "evidence lookup complete"
                );
                items
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "evidence lookup failed, treating as no evidence"
                );
                Vec::new()
            }
        }
    }

    /// Search with the timeout applied and the cap enforced.
    pub async fn try_lookup(&self, statement: &str) -> Result<Vec<EvidenceItem>, ProviderError> {
        let search = self.provider.search(statement, self.max_results);
        let mut items = tokio::time::timeout(self.timeout, search)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        items.truncate(self.max_results);
        Ok(items)
    }
}

impl std::fmt::Debug for EvidenceLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceLookup")
            .field("provider", &self.provider.name())
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}
