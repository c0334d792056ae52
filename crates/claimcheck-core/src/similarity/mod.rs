//! Similarity measures between a statement and an evidence snippet.
//!
//! - [`cosine_similarity`] compares two embedding vectors.
//! - [`lexical_similarity`] is the deterministic word-overlap fallback that
//!   needs no provider at all.
//!
//! Both return values in [0, 1].

mod lexical;

pub use lexical::{lexical_breakdown, lexical_similarity, LexicalBreakdown, NEUTRAL_SCORE};

use thiserror::Error;

/// Errors from vector comparison.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("Embedding is empty")]
    EmptyVector,

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding has zero norm")]
    ZeroNorm,
}

/// Cosine similarity of two embeddings, clamped to [0, 1].
///
/// A zero-norm vector is an error rather than a score: callers treat it as
/// a failed tier and move on.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.is_empty() || b.is_empty() {
        return Err(SimilarityError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::ZeroNorm);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_nan() {
        return Err(SimilarityError::ZeroNorm);
    }

    Ok(similarity.clamp(0.0, 1.0))
}
