//! # claimcheck-runtime
//!
//! Networked half of claimcheck: evidence search, embedding providers,
//! tiered similarity scoring and the validation pipeline.
//!
//! The pure logic (segmentation, lexical similarity, classification,
//! verdict synthesis) lives in `claimcheck-core` and never touches the
//! network. This crate wires it to:
//! - A web search provider for evidence (You.com)
//! - Embedding providers for semantic similarity (Gemini, then OpenAI)
//! - A lexical fallback that always produces a score
//!
//! HTTP clients are behind the `gemini`, `openai` and `you` features.
//! Without them the providers report `NotConfigured` and scoring falls
//! through to the lexical tier.
//!
//! ## Example
//!
//! ```rust,ignore
//! use claimcheck_runtime::{ProviderSettings, RuntimeConfig, ValidationOrchestrator};
//!
//! let settings = ProviderSettings::from_env();
//! let orchestrator = ValidationOrchestrator::from_settings(&settings, RuntimeConfig::default())?;
//!
//! let verdict = orchestrator.validate("The Eiffel Tower is located in Paris.").await;
//! println!("{}", verdict.message);
//! ```

pub mod config;
pub mod health;
pub mod lookup;
pub mod orchestrator;
pub mod providers;
pub mod scoring;

pub use config::{
    ConfigError, EmbeddingModelConfig, EmbeddingsConfig, RuntimeConfig, SearchConfig,
};
pub use health::{HealthReport, HealthStatus};
pub use lookup::EvidenceLookup;
pub use orchestrator::{RuntimeError, ValidationOrchestrator, ValidationOrchestratorBuilder};
pub use providers::{
    ApiCredential, CredentialSource, EmbeddingProvider, EmbeddingProviderFactory, ProviderError,
    ProviderRegistry, ProviderSettings, SearchProvider,
};
pub use scoring::{
    EmbeddingMode, EmbeddingStrategy, LexicalStrategy, ScoringError, SimilarityScorer,
    SimilarityStrategy, TieredScore,
};
