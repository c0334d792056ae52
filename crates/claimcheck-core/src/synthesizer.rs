//! Synthesizer: aggregates per-statement results into a verdict.
//!
//! Rules:
//! 1. `validated` is true iff any claim is Medium or High
//! 2. The message names the claim count and the similarity tier
//! 3. Rejections and failures produce a verdict too; never an error

use chrono::Utc;

use crate::types::{ClaimResult, SimilarityTier, ValidationVerdict};

/// How much of the raw input survives into the fallback claim.
pub const FALLBACK_CLAIM_CHARS: usize = 200;

/// Claim text used when the request failed on empty input.
pub const FALLBACK_CLAIM_EMPTY: &str = "Error processing";

pub const EMPTY_INPUT_MESSAGE: &str = "Error: Input text cannot be empty.";

pub const NO_STATEMENTS_MESSAGE: &str = "No text provided. Please provide text to validate.";

pub const MISSING_SEARCH_KEY_MESSAGE: &str =
    "Error: YOU_API_KEY not set in environment variables. This is required for web search.";

/// Builds [`ValidationVerdict`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate scored claims into a verdict.
    pub fn synthesize(&self, claims: Vec<ClaimResult>, tier: SimilarityTier) -> ValidationVerdict {
        let validated = claims.iter().any(|c| c.confidence.is_supported());
        let message = self.build_message(&claims, tier);

        ValidationVerdict {
            validated,
            claims,
            message,
            similarity_tier: Some(tier),
            evaluated_at: Utc::now(),
        }
    }

    /// A request turned away before any scoring.
    pub fn rejected(&self, message: impl Into<String>) -> ValidationVerdict {
        ValidationVerdict {
            validated: false,
            claims: Vec::new(),
            message: message.into(),
            similarity_tier: None,
            evaluated_at: Utc::now(),
        }
    }

    /// A request that failed mid-pipeline. The raw input comes back as a
    /// single Low claim.
    pub fn failed(&self, raw_input: &str, error: &str) -> ValidationVerdict {
        let claim = if raw_input.is_empty() {
            FALLBACK_CLAIM_EMPTY.to_string()
        } else {
            truncate_chars(raw_input, FALLBACK_CLAIM_CHARS).to_string()
        };

        ValidationVerdict {
            validated: false,
            claims: vec![ClaimResult::unsupported(claim)],
            message: format!("Error processing request: {}. Returning input as claim.", error),
            similarity_tier: None,
            evaluated_at: Utc::now(),
        }
    }

    fn build_message(&self, claims: &[ClaimResult], tier: SimilarityTier) -> String {
        let base = format!("Processed {} claim(s) using {}.", claims.len(), tier.label());

        if claims.iter().any(|c| c.confidence.is_supported()) {
            format!("{} Found strong evidence for some claims.", base)
        } else if claims.iter().any(|c| c.similarity > 0.0) {
            format!("{} Claims found but need stronger evidence.", base)
        } else {
            base
        }
    }
}

/// The first `max` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    fn claim(similarity: f64, confidence: Confidence) -> ClaimResult {
        ClaimResult {
            similarity,
            confidence,
            ..ClaimResult::unsupported("claim")
        }
    }

    #[test]
    fn test_any_medium_validates() {
        let verdict = Synthesizer::new().synthesize(
            vec![
                claim(0.1, Confidence::Low),
                claim(0.55, Confidence::Medium),
            ],
            SimilarityTier::Lexical,
        );

        assert!(verdict.validated);
        assert_eq!(
            verdict.message,
            "Processed 2 claim(s) using text-based matching. Found strong evidence for some claims."
        );
        assert_eq!(verdict.similarity_tier, Some(SimilarityTier::Lexical));
    }

    #[test]
    fn test_all_low_is_not_validated() {
        let verdict = Synthesizer::new().synthesize(
            vec![ClaimResult::unsupported("a"), ClaimResult::unsupported("b")],
            SimilarityTier::GeminiEmbedding,
        );

        assert!(!verdict.validated);
        assert_eq!(
            verdict.message,
            "Processed 2 claim(s) using Gemini embeddings (free tier)."
        );
    }

    #[test]
    fn test_weak_evidence_message() {
        let verdict = Synthesizer::new().synthesize(
            vec![claim(0.3, Confidence::Low)],
            SimilarityTier::OpenAiEmbedding,
        );

        assert!(!verdict.validated);
        assert!(verdict.message.ends_with("Claims found but need stronger evidence."));
    }

    #[test]
    fn test_rejected_has_no_claims_or_tier() {
        let verdict = Synthesizer::new().rejected(EMPTY_INPUT_MESSAGE);
        assert!(!verdict.validated);
        assert!(verdict.claims.is_empty());
        assert!(verdict.similarity_tier.is_none());

        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json.get("similarity_tier").is_none());
    }

    #[test]
    fn test_failed_truncates_input() {
        let input = "é".repeat(250);
        let verdict = Synthesizer::new().failed(&input, "boom");

        assert!(!verdict.validated);
        assert_eq!(verdict.claims.len(), 1);
        assert_eq!(verdict.claims[0].statement.chars().count(), FALLBACK_CLAIM_CHARS);
        assert_eq!(verdict.claims[0].confidence, Confidence::Low);
        assert_eq!(
            verdict.message,
            "Error processing request: boom. Returning input as claim."
        );
    }

    #[test]
    fn test_failed_on_empty_input() {
        let verdict = Synthesizer::new().failed("", "boom");
        assert_eq!(verdict.claims[0].statement, FALLBACK_CLAIM_EMPTY);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
