//! Lexical similarity: the always-available scoring tier.
//!
//! Score = min(1, 0.7 × Jaccard + 0.3 × phrase ratio), where
//! - Jaccard is computed over lowercased, stop-word-free word sets;
//! - the phrase ratio counts statement words longer than three characters
//!   that occur anywhere in the snippet, over the statement's word count.
//!
//! The phrase ratio is anchored on the statement, so `score(a, b)` and
//! `score(b, a)` share the Jaccard term but may differ in the phrase term.
//!
//! Jaccard words have leading and trailing ASCII punctuation removed, so
//! "Paris." and "Paris," compare equal. Phrase tokens are the raw
//! whitespace-delimited words, punctuation included.

use std::collections::HashSet;

use crate::patterns::is_stop_word;

/// Returned when the statement has no content words.
pub const NEUTRAL_SCORE: f64 = 0.5;

const JACCARD_WEIGHT: f64 = 0.7;
const PHRASE_WEIGHT: f64 = 0.3;

/// Words must be longer than this to count towards the phrase ratio.
const MIN_PHRASE_CHARS: usize = 3;

/// The components of a lexical score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalBreakdown {
    /// |A ∩ B| / |A ∪ B| over content words.
    pub jaccard: f64,

    /// Matched statement words / statement word count.
    pub phrase_ratio: f64,

    /// Final combined score in [0, 1].
    pub score: f64,
}

/// Lexical similarity between a statement and a snippet, in [0, 1].
pub fn lexical_similarity(statement: &str, snippet: &str) -> f64 {
    lexical_breakdown(statement, snippet).score
}

/// Compute the lexical score along with its components.
pub fn lexical_breakdown(statement: &str, snippet: &str) -> LexicalBreakdown {
    let statement_lower = statement.to_lowercase();
    let snippet_lower = snippet.to_lowercase();

    let statement_words = content_words(&statement_lower);
    if statement_words.is_empty() {
        return LexicalBreakdown {
            jaccard: 0.0,
            phrase_ratio: 0.0,
            score: NEUTRAL_SCORE,
        };
    }
    let snippet_words = content_words(&snippet_lower);

    let jaccard = jaccard(&statement_words, &snippet_words);
    let phrase_ratio = phrase_match_ratio(&statement_lower, &snippet_lower);
    let score = (JACCARD_WEIGHT * jaccard + PHRASE_WEIGHT * phrase_ratio).min(1.0);

    LexicalBreakdown {
        jaccard,
        phrase_ratio,
        score,
    }
}

/// Strip leading and trailing ASCII punctuation from a token.
fn normalize_token(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// Lowercased text to its set of non-stop-words.
fn content_words(lowered: &str) -> HashSet<&str> {
    lowered
        .split_whitespace()
        .map(normalize_token)
        .filter(|word| !word.is_empty() && !is_stop_word(word))
        .collect()
}

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Fraction of raw statement tokens (stop words included in the
/// denominator) that are long enough and appear as substrings of the snippet.
fn phrase_match_ratio(statement_lower: &str, snippet_lower: &str) -> f64 {
    let tokens: Vec<&str> = statement_lower.split_whitespace().collect();
    let matches = tokens
        .iter()
        .filter(|token| token.chars().count() > MIN_PHRASE_CHARS && snippet_lower.contains(**token))
        .count();

    matches as f64 / tokens.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_eiffel_tower_overlap_is_medium_or_better() {
        let breakdown = lexical_breakdown(
            "The Eiffel Tower is located in Paris.",
            "The Eiffel Tower is in Paris, France.",
        );

        // {eiffel, tower, located, paris} vs {eiffel, tower, paris, france}
        assert!((breakdown.jaccard - 0.6).abs() < 1e-9);
        // eiffel, tower out of 7 tokens; "paris." is not in the snippet
        assert!((breakdown.phrase_ratio - 2.0 / 7.0).abs() < 1e-9);
        assert!((breakdown.score - (0.42 + 0.3 * 2.0 / 7.0)).abs() < 1e-9);
        assert!(breakdown.score >= 0.5);
    }

    #[test]
    fn test_phrase_tokens_keep_punctuation() {
        let breakdown = lexical_breakdown("Mars, Venus.", "mars venus");

        assert_eq!(breakdown.jaccard, 1.0);
        assert_eq!(breakdown.phrase_ratio, 0.0);
        assert!((breakdown.score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_stop_word_only_statement_is_neutral() {
        assert_eq!(lexical_similarity("The. And? Or", "Paris"), NEUTRAL_SCORE);
        assert_eq!(lexical_similarity("", "Paris"), NEUTRAL_SCORE);
    }

    #[test]
    fn test_empty_snippet_scores_zero() {
        assert_eq!(lexical_similarity("Water boils at 100 degrees", ""), 0.0);
    }

    #[test]
    fn test_identical_text_is_capped_by_phrase_term() {
        // Jaccard is 1.0, but only 3 of 5 tokens are long enough to count
        // as phrases: 0.7 + 0.3 * 0.6.
        let text = "Python is a programming language";
        assert!((lexical_similarity(text, text) - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let score = lexical_similarity(
            "The moon landing happened in 1969",
            "Bananas are an excellent source of potassium.",
        );
        assert!(score < 0.5);
    }

    #[test]
    fn test_phrase_match_is_substring_based() {
        // "program" is not a word of the snippet but "programming" contains it.
        let breakdown = lexical_breakdown("program", "programming languages");
        assert_eq!(breakdown.phrase_ratio, 1.0);
        assert_eq!(breakdown.jaccard, 0.0);
        assert!((breakdown.score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_short_words_do_not_count_as_phrases() {
        let breakdown = lexical_breakdown("cat sat", "the cat sat down");
        assert_eq!(breakdown.phrase_ratio, 0.0);
    }

    #[test]
    fn test_phrase_term_is_asymmetric() {
        let a = "Paris";
        let b = "Paris is the capital of France";
        let ab = lexical_breakdown(a, b);
        let ba = lexical_breakdown(b, a);

        assert_eq!(ab.jaccard, ba.jaccard);
        assert_ne!(ab.phrase_ratio, ba.phrase_ratio);
    }

    proptest! {
        #[test]
        fn prop_score_in_unit_range(statement in ".{0,80}", snippet in ".{0,80}") {
            let score = lexical_similarity(&statement, &snippet);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_jaccard_is_symmetric(a in "[a-z ,.]{0,60}", b in "[a-z ,.]{0,60}") {
            // A side with no content words reports a Jaccard of 0, which is
            // also what the other direction computes against an empty set.
            let ab = lexical_breakdown(&a, &b);
            let ba = lexical_breakdown(&b, &a);
            prop_assert!((ab.jaccard - ba.jaccard).abs() < 1e-12);
        }
    }
}
