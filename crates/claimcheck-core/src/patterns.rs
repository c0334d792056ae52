//! Shared text patterns.
//!
//! The sentence boundary regex is used by the segmenter; the stop-word set
//! is used by lexical similarity. Both are ASCII heuristics only.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Sentence-terminal punctuation followed by whitespace.
    ///
    /// The punctuation character is always one byte, so a match starting at
    /// `m.start()` ends the preceding sentence at `m.start() + 1`.
    pub static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+").unwrap();

    /// Words ignored when computing word-set overlap.
    pub static ref STOP_WORDS: HashSet<&'static str> = [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
        "with", "by", "is", "are", "was", "were", "be", "been", "being", "have",
        "has", "had", "do", "does", "did", "will", "would", "could", "should",
        "may", "might", "must", "can", "this", "that", "these", "those",
    ]
    .into_iter()
    .collect();
}

/// Check if a lowercased word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_word_set_size() {
        assert_eq!(STOP_WORDS.len(), 39);
    }

    #[test]
    fn test_stop_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("those"));
        assert!(!is_stop_word("eiffel"));
        // Matching is case-sensitive; callers lowercase first.
        assert!(!is_stop_word("The"));
    }

    #[test]
    fn test_sentence_boundary() {
        assert!(SENTENCE_BOUNDARY.is_match("Paris. It"));
        assert!(SENTENCE_BOUNDARY.is_match("Really?\nYes"));
        assert!(!SENTENCE_BOUNDARY.is_match("3.14 is pi"));
        assert!(!SENTENCE_BOUNDARY.is_match("Done."));
    }
}
