//! Validation orchestrator.
//!
//! Drives one request end to end:
//! - Rejects early on a missing search credential, empty input, or no statements
//! - Looks up and scores evidence for each statement, one at a time
//! - Aggregates claim results through the [`Synthesizer`]
//!
//! Every path yields a [`ValidationVerdict`]. A panic while processing one
//! statement degrades that statement to Low; a panic anywhere else turns
//! the whole request into the fallback verdict.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use claimcheck_core::synthesizer::{
    EMPTY_INPUT_MESSAGE, MISSING_SEARCH_KEY_MESSAGE, NO_STATEMENTS_MESSAGE,
};
use claimcheck_core::{
    BestMatch, ClaimResult, Segmenter, SimilarityTier, Synthesizer, ValidationVerdict,
};

use crate::config::{ConfigError, RuntimeConfig};
use crate::lookup::EvidenceLookup;
use crate::providers::{ProviderRegistry, ProviderSettings, SearchProvider, YouSearchProvider};
use crate::scoring::SimilarityScorer;

/// Errors building an orchestrator.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Runs the claim validation pipeline.
///
/// Holds only read-only configuration and shared providers, so one
/// instance can serve concurrent callers.
pub struct ValidationOrchestrator {
    config: RuntimeConfig,
    segmenter: Segmenter,

    /// `None` when no search credential was configured.
    lookup: Option<EvidenceLookup>,

    scorer: SimilarityScorer,
    synthesizer: Synthesizer,
}

impl ValidationOrchestrator {
    pub fn builder() -> ValidationOrchestratorBuilder {
        ValidationOrchestratorBuilder::default()
    }

    /// Build from resolved credentials with the built-in providers.
    pub fn from_settings(
        settings: &ProviderSettings,
        config: RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        Self::builder().config(config).settings(settings).build()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The tier named in verdict messages: the first in the scoring chain.
    pub fn similarity_tier(&self) -> SimilarityTier {
        self.scorer.preferred_tier()
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn has_search(&self) -> bool {
        self.lookup.is_some()
    }

    /// Validate `text`. Never fails.
    pub async fn validate(&self, text: &str) -> ValidationVerdict {
        match AssertUnwindSafe(self.run(text)).catch_unwind().await {
            Ok(verdict) => verdict,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(error = %message, "validation failed, returning input as claim");
                self.synthesizer.failed(text, &message)
            }
        }
    }

    async fn run(&self, text: &str) -> ValidationVerdict {
        let Some(lookup) = &self.lookup else {
            warn!("search credential missing, request rejected");
            return self.synthesizer.rejected(MISSING_SEARCH_KEY_MESSAGE);
        };

        if text.trim().is_empty() {
            return self.synthesizer.rejected(EMPTY_INPUT_MESSAGE);
        }

        let statements = self.segmenter.segment(text);
        if statements.is_empty() {
            return self.synthesizer.rejected(NO_STATEMENTS_MESSAGE);
        }

        let mut claims = Vec::with_capacity(statements.len());
        for (index, statement) in statements.iter().enumerate() {
            debug!(index, statement = %statement, "processing statement");
            claims.push(self.process_statement(lookup, statement).await);
        }

        let verdict = self
            .synthesizer
            .synthesize(claims, self.scorer.preferred_tier());

        let (high, medium, low) = verdict.confidence_counts();
        info!(
            claims = verdict.claims.len(),
            high,
            medium,
            low,
            validated = verdict.validated,
            tier = ?self.scorer.preferred_tier(),
            "validation complete"
        );

        verdict
    }

    /// Score one statement, degrading to Low on panic.
    async fn process_statement(&self, lookup: &EvidenceLookup, statement: &str) -> ClaimResult {
        match AssertUnwindSafe(self.score_statement(lookup, statement))
            .catch_unwind()
            .await
        {
            Ok(claim) => claim,
            Err(panic) => {
                warn!(
                    statement = %statement,
                    error = %panic_message(panic.as_ref()),
                    "statement processing failed, marking unsupported"
                );
                ClaimResult::unsupported(statement)
            }
        }
    }

    async fn score_statement(&self, lookup: &EvidenceLookup, statement: &str) -> ClaimResult {
        let evidence = lookup.lookup(statement).await;
        if evidence.is_empty() {
            return ClaimResult::unsupported(statement);
        }

        let mut best = BestMatch::new();
        for item in &evidence {
            let Some(snippet) = item.scorable_snippet() else {
                continue;
            };
            let scored = self.scorer.score(statement, snippet).await;
            best.consider(item, scored.score);
        }

        best.finish(statement).into_claim_result()
    }
}

impl std::fmt::Debug for ValidationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationOrchestrator")
            .field("config", &self.config)
            .field("lookup", &self.lookup)
            .field("scorer", &self.scorer)
            .finish()
    }
}

/// Builder for [`ValidationOrchestrator`].
///
/// Explicit providers win over those derived from [`ProviderSettings`].
#[derive(Default)]
pub struct ValidationOrchestratorBuilder {
    config: RuntimeConfig,
    settings: Option<ProviderSettings>,
    registry: Option<ProviderRegistry>,
    search: Option<Arc<dyn SearchProvider>>,
    scorer: Option<SimilarityScorer>,
}

impl ValidationOrchestratorBuilder {
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Credentials used for any provider not set explicitly.
    pub fn settings(mut self, settings: &ProviderSettings) -> Self {
        self.settings = Some(settings.clone());
        self
    }

    /// Embedding factories; defaults to [`ProviderRegistry::with_defaults`].
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    pub fn scorer(mut self, scorer: SimilarityScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn build(self) -> Result<ValidationOrchestrator, RuntimeError> {
        self.config.validate()?;

        let settings = self.settings.unwrap_or_default();

        let search = self.search.or_else(|| {
            settings.search().map(|credential| {
                let provider = YouSearchProvider::with_credential(credential.clone())
                    .with_base_url(self.config.search.base_url.clone());
                Arc::new(provider) as Arc<dyn SearchProvider>
            })
        });
        let lookup = search.map(|provider| EvidenceLookup::new(provider, &self.config.search));

        let scorer = match self.scorer {
            Some(scorer) => scorer,
            None => {
                let registry = self.registry.unwrap_or_else(ProviderRegistry::with_defaults);
                SimilarityScorer::from_settings(&settings, &self.config, &registry)
            }
        };

        Ok(ValidationOrchestrator {
            segmenter: Segmenter::new(self.config.max_statements),
            config: self.config,
            lookup,
            scorer,
            synthesizer: Synthesizer::new(),
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
