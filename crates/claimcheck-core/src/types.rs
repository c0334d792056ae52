//! Core types for claimcheck.
//!
//! Field names on the serialized forms follow the validation wire shape
//! (`claim`, `similarity_score`, `best_match_snippet`, ...) so results can be
//! handed to any JSON consumer unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence tier for a statement's best similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Whether this tier counts towards a validated verdict.
    pub fn is_supported(&self) -> bool {
        matches!(self, Confidence::Medium | Confidence::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Similarity strategy, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityTier {
    /// Embedding provider A (Gemini, free tier).
    GeminiEmbedding,

    /// Embedding provider B (OpenAI, paid).
    OpenAiEmbedding,

    /// Deterministic word-overlap scoring. Always available.
    Lexical,
}

impl SimilarityTier {
    /// Human-readable name used in verdict messages and health reports.
    pub fn label(&self) -> &'static str {
        match self {
            SimilarityTier::GeminiEmbedding => "Gemini embeddings (free tier)",
            SimilarityTier::OpenAiEmbedding => "OpenAI embeddings",
            SimilarityTier::Lexical => "text-based matching",
        }
    }

    /// Whether this tier needs a network provider.
    pub fn is_embedding(&self) -> bool {
        !matches!(self, SimilarityTier::Lexical)
    }
}

impl fmt::Display for SimilarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single search-result record considered as support for a statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub snippet: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl EvidenceItem {
    /// Create an item with a snippet and URL.
    pub fn new(snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: None,
            snippet: Some(snippet.into()),
            url: Some(url.into()),
        }
    }

    /// The snippet, if present and non-empty. Only these items are scored.
    pub fn scorable_snippet(&self) -> Option<&str> {
        self.snippet.as_deref().filter(|s| !s.is_empty())
    }
}

/// Outcome for one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    #[serde(rename = "claim")]
    pub statement: String,

    #[serde(rename = "similarity_score")]
    pub similarity: f64,

    pub confidence: Confidence,

    #[serde(rename = "best_match_snippet", default)]
    pub best_snippet: Option<String>,

    #[serde(rename = "best_match_url", default)]
    pub best_url: Option<String>,
}

impl ClaimResult {
    /// A statement with no usable evidence: similarity 0.0, Low confidence.
    pub fn unsupported(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            similarity: 0.0,
            confidence: Confidence::Low,
            best_snippet: None,
            best_url: None,
        }
    }
}

/// Request-level outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// True iff at least one claim reached Medium or High confidence.
    pub validated: bool,

    pub claims: Vec<ClaimResult>,

    pub message: String,

    /// Tier reported for the request. Absent when the request was rejected
    /// before any scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_tier: Option<SimilarityTier>,

    pub evaluated_at: DateTime<Utc>,
}

impl ValidationVerdict {
    /// Number of claims at each confidence tier, as (high, medium, low).
    pub fn confidence_counts(&self) -> (usize, usize, usize) {
        self.claims
            .iter()
            .fold((0, 0, 0), |(h, m, l), claim| match claim.confidence {
                Confidence::High => (h + 1, m, l),
                Confidence::Medium => (h, m + 1, l),
                Confidence::Low => (h, m, l + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_capitalized() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
        assert!(!Confidence::Low.is_supported());
        assert!(Confidence::Medium.is_supported());
    }

    #[test]
    fn test_claim_result_wire_names() {
        let claim = ClaimResult {
            statement: "Water boils at 100 degrees Celsius".to_string(),
            similarity: 0.91,
            confidence: Confidence::High,
            best_snippet: Some("Water boils at 100 °C at sea level.".to_string()),
            best_url: Some("https://example.com/water".to_string()),
        };

        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["claim"], "Water boils at 100 degrees Celsius");
        assert_eq!(value["similarity_score"], 0.91);
        assert_eq!(value["confidence"], "High");
        assert_eq!(value["best_match_url"], "https://example.com/water");
    }

    #[test]
    fn test_scorable_snippet_skips_empty() {
        let empty = EvidenceItem {
            title: Some("t".to_string()),
            snippet: Some(String::new()),
            url: None,
        };
        assert!(empty.scorable_snippet().is_none());
        assert!(EvidenceItem::default().scorable_snippet().is_none());
        assert_eq!(
            EvidenceItem::new("text", "https://x").scorable_snippet(),
            Some("text")
        );
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(SimilarityTier::Lexical.label(), "text-based matching");
        assert!(SimilarityTier::GeminiEmbedding.is_embedding());
        assert!(!SimilarityTier::Lexical.is_embedding());
    }
}
