//! Tiered similarity scoring.
//!
//! Chain: Gemini embeddings → OpenAI embeddings → lexical.
//!
//! Each tier is a [`SimilarityStrategy`]. The scorer tries them in order;
//! any error (provider failure, timeout, zero-norm or mismatched vectors)
//! is logged and the next tier is tried. The lexical tier never fails and
//! always ends the chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use claimcheck_core::{cosine_similarity, lexical_similarity, SimilarityError, SimilarityTier};

use crate::config::RuntimeConfig;
use crate::providers::{EmbeddingProvider, ProviderError, ProviderRegistry, ProviderSettings};

/// Why a tier could not produce a score.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Similarity error: {0}")]
    Similarity(#[from] SimilarityError),

    #[error("Embedding timed out after {0:?}")]
    Timeout(Duration),

    #[error("Expected {expected} embeddings, got {actual}")]
    MissingEmbedding { expected: usize, actual: usize },
}

/// One scoring tier.
#[async_trait]
pub trait SimilarityStrategy: Send + Sync {
    fn tier(&self) -> SimilarityTier;

    /// Similarity of `statement` and `snippet` in [0, 1].
    async fn score(&self, statement: &str, snippet: &str) -> Result<f64, ScoringError>;
}

/// How an embedding tier sends its two texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// One `embed` call per text.
    Separate,
    /// Both texts in one `embed_batch` call.
    Batched,
}

/// Cosine similarity over provider embeddings.
pub struct EmbeddingStrategy {
    tier: SimilarityTier,
    provider: Arc<dyn EmbeddingProvider>,
    mode: EmbeddingMode,
    timeout: Duration,
}

impl EmbeddingStrategy {
    pub fn new(
        tier: SimilarityTier,
        provider: Arc<dyn EmbeddingProvider>,
        mode: EmbeddingMode,
        timeout: Duration,
    ) -> Self {
        Self {
            tier,
            provider,
            mode,
            timeout,
        }
    }

    /// Gemini tier: texts embedded independently.
    pub fn gemini(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self::new(
            SimilarityTier::GeminiEmbedding,
            provider,
            EmbeddingMode::Separate,
            timeout,
        )
    }

    /// OpenAI tier: texts embedded in one batch.
    pub fn openai(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self::new(
            SimilarityTier::OpenAiEmbedding,
            provider,
            EmbeddingMode::Batched,
            timeout,
        )
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        tokio::time::timeout(self.timeout, self.provider.embed(text))
            .await
            .map_err(|_| ScoringError::Timeout(self.timeout))?
            .map_err(ScoringError::from)
    }

    async fn embed_pair(
        &self,
        statement: &str,
        snippet: &str,
    ) -> Result<(Vec<f32>, Vec<f32>), ScoringError> {
        match self.mode {
            EmbeddingMode::Separate => {
                let a = self.embed_one(statement).await?;
                let b = self.embed_one(snippet).await?;
                Ok((a, b))
            }
            EmbeddingMode::Batched => {
                let texts = [statement, snippet];
                let batch = self.provider.embed_batch(&texts);
                let vectors = tokio::time::timeout(self.timeout, batch)
                    .await
                    .map_err(|_| ScoringError::Timeout(self.timeout))??;

                let [a, b]: [Vec<f32>; 2] =
                    vectors
                        .try_into()
                        .map_err(|v: Vec<Vec<f32>>| ScoringError::MissingEmbedding {
                            expected: 2,
                            actual: v.len(),
                        })?;
                Ok((a, b))
            }
        }
    }
}

#[async_trait]
impl SimilarityStrategy for EmbeddingStrategy {
    fn tier(&self) -> SimilarityTier {
        self.tier
    }

    async fn score(&self, statement: &str, snippet: &str) -> Result<f64, ScoringError> {
        let (a, b) = self.embed_pair(statement, snippet).await?;
        Ok(cosine_similarity(&a, &b)?)
    }
}

impl std::fmt::Debug for EmbeddingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingStrategy")
            .field("tier", &self.tier)
            .field("provider", &self.provider.name())
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Word-overlap scoring. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalStrategy;

#[async_trait]
impl SimilarityStrategy for LexicalStrategy {
    fn tier(&self) -> SimilarityTier {
        SimilarityTier::Lexical
    }

    async fn score(&self, statement: &str, snippet: &str) -> Result<f64, ScoringError> {
        Ok(lexical_similarity(statement, snippet))
    }
}

/// A score and the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TieredScore {
    pub score: f64,
    pub tier: SimilarityTier,
}

/// Ordered chain of similarity tiers.
#[derive(Clone)]
pub struct SimilarityScorer {
    strategies: Vec<Arc<dyn SimilarityStrategy>>,
}

impl SimilarityScorer {
    /// Build a scorer from tiers in priority order. Lexical scoring is
    /// appended unless the chain already ends with it.
    pub fn new(mut strategies: Vec<Arc<dyn SimilarityStrategy>>) -> Self {
        let ends_lexical = strategies
            .last()
            .is_some_and(|s| s.tier() == SimilarityTier::Lexical);
        if !ends_lexical {
            strategies.push(Arc::new(LexicalStrategy));
        }
        Self { strategies }
    }

    /// Lexical scoring only.
    pub fn lexical_only() -> Self {
        Self::new(Vec::new())
    }

    /// Build the chain from the credentials that are present.
    ///
    /// A provider that cannot be created, including one whose HTTP feature
    /// is off, is left out of the chain.
    pub fn from_settings(
        settings: &ProviderSettings,
        config: &RuntimeConfig,
        registry: &ProviderRegistry,
    ) -> Self {
        let timeout = config.embeddings.timeout;
        let mut strategies: Vec<Arc<dyn SimilarityStrategy>> = Vec::new();

        if let Some(credential) = settings.gemini() {
            let provider_config = config.embeddings.gemini.to_provider_config();
            match registry.create_with_credential("gemini", &provider_config, credential.clone()) {
                Ok(provider) => {
                    strategies.push(Arc::new(EmbeddingStrategy::gemini(provider, timeout)))
                }
                Err(e) => warn!(provider = "gemini", error = %e, "embedding tier unavailable"),
            }
        }

        if let Some(credential) = settings.openai() {
            let provider_config = config.embeddings.openai.to_provider_config();
            match registry.create_with_credential("openai", &provider_config, credential.clone()) {
                Ok(provider) => {
                    strategies.push(Arc::new(EmbeddingStrategy::openai(provider, timeout)))
                }
                Err(e) => warn!(provider = "openai", error = %e, "embedding tier unavailable"),
            }
        }

        Self::new(strategies)
    }

    /// The tier tried first.
    pub fn preferred_tier(&self) -> SimilarityTier {
        self.strategies
            .first()
            .map(|s| s.tier())
            .unwrap_or(SimilarityTier::Lexical)
    }

    /// Tiers in the order they are tried.
    pub fn tiers(&self) -> Vec<SimilarityTier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Score with the first tier that succeeds.
    pub async fn score(&self, statement: &str, snippet: &str) -> TieredScore {
        for strategy in &self.strategies {
            match strategy.score(statement, snippet).await {
                Ok(score) => {
                    debug!(tier = ?strategy.tier(), score, "snippet scored");
                    return TieredScore {
                        score,
                        tier: strategy.tier(),
                    };
                }
                Err(e) => {
                    warn!(
                        tier = ?strategy.tier(),
                        error = %e,
                        "similarity tier failed, trying next in chain"
                    );
                }
            }
        }

        // Unreachable while the chain ends with LexicalStrategy.
        TieredScore {
            score: lexical_similarity(statement, snippet),
            tier: SimilarityTier::Lexical,
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::lexical_only()
    }
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("tiers", &self.tiers())
            .finish()
    }
}
