//! # claimcheck-core
//!
//! Deterministic claim segmentation and evidence scoring.
//!
//! This crate holds every part of claim validation that needs no network:
//! - Splitting free text into candidate statements
//! - Lexical and cosine similarity
//! - Confidence classification and best-evidence selection
//! - Aggregating claim results into a verdict
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **Total**: No operation here fails on arbitrary text
//! 3. **No I/O**: Providers and lookups live in `claimcheck-runtime`
//!
//! ## Example
//!
//! ```rust
//! use claimcheck_core::{classify, lexical_similarity, segment, Confidence};
//!
//! let statements = segment("The Eiffel Tower is located in Paris.", 5);
//! let score = lexical_similarity(&statements[0], "The Eiffel Tower is in Paris, France.");
//! assert_eq!(classify(score), Confidence::Medium);
//! ```

pub mod confidence;
pub mod evidence;
pub mod patterns;
pub mod segmenter;
pub mod similarity;
pub mod synthesizer;
pub mod types;

// Re-export main types at crate root
pub use confidence::{classify, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use evidence::{round_score, select_best, BestMatch, ScoredEvidence};
pub use segmenter::{is_factual, segment, Segmenter, DEFAULT_MAX_STATEMENTS};
pub use similarity::{
    cosine_similarity, lexical_breakdown, lexical_similarity, LexicalBreakdown, SimilarityError,
    NEUTRAL_SCORE,
};
pub use synthesizer::Synthesizer;
pub use types::{ClaimResult, Confidence, EvidenceItem, SimilarityTier, ValidationVerdict};
