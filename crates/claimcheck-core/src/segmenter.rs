//! Segmenter: splits free text into candidate factual statements.
//!
//! The filter is deliberately permissive. Only short pure questions
//! ("What?", "Is it?") are set aside, and even those are used to backfill
//! when fewer than `max_statements` fragments were accepted. The cap is the
//! only hard limit once the input has content.

use crate::patterns::SENTENCE_BOUNDARY;

/// Default cap on statements per request.
pub const DEFAULT_MAX_STATEMENTS: usize = 5;

/// Questions with fewer words than this are not treated as claims.
const MIN_QUESTION_WORDS: usize = 3;

/// Splits text into at most `max_statements` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    max_statements: usize,
}

impl Segmenter {
    /// Create a segmenter. A cap of zero is raised to one so that non-empty
    /// input always yields at least one statement.
    pub fn new(max_statements: usize) -> Self {
        Self {
            max_statements: max_statements.max(1),
        }
    }

    pub fn max_statements(&self) -> usize {
        self.max_statements
    }

    /// Segment `text`. See [`segment`].
    pub fn segment(&self, text: &str) -> Vec<String> {
        segment(text, self.max_statements)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATEMENTS)
    }
}

/// Split `text` into an ordered list of statements.
///
/// Returns an empty list only when `text` is blank. Never fails.
pub fn segment(text: &str, max_statements: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let cap = max_statements.max(1);
    let fragments = split_fragments(trimmed);

    let mut selected: Vec<usize> = Vec::with_capacity(cap);
    for (index, fragment) in fragments.iter().enumerate() {
        if selected.len() >= cap {
            break;
        }
        if is_factual(fragment) {
            selected.push(index);
        }
    }

    if selected.len() < cap {
        let backfill: Vec<usize> = fragments
            .iter()
            .enumerate()
            .filter(|(_, fragment)| !selected.iter().any(|&i| fragments[i] == **fragment))
            .map(|(index, _)| index)
            .take(cap - selected.len())
            .collect();

        selected.extend(backfill);
        selected.sort_unstable();
    }

    let statements: Vec<String> = selected
        .into_iter()
        .map(|index| fragments[index].to_string())
        .collect();

    if statements.is_empty() {
        return vec![trimmed.to_string()];
    }

    statements
}

/// Whether a fragment should be treated as a claim.
///
/// Rejects fragments with no words and short questions; accepts everything
/// else, including opinions and long questions.
pub fn is_factual(fragment: &str) -> bool {
    let words = fragment.split_whitespace().count();
    if words == 0 {
        return false;
    }
    !(fragment.trim_end().ends_with('?') && words < MIN_QUESTION_WORDS)
}

/// Split trimmed text into trimmed, non-empty fragments.
fn split_fragments(text: &str) -> Vec<&str> {
    let mut pieces = split_sentences(text);

    // Unpunctuated or list-like input: fall back to line breaks.
    if pieces.len() == 1 && pieces[0].contains('\n') {
        pieces = pieces[0].split('\n').collect();
    }

    let fragments: Vec<&str> = pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if fragments.is_empty() {
        vec![text]
    } else {
        fragments
    }
}

/// Split after every `.`, `!` or `?` that is followed by whitespace.
/// The punctuation stays with the sentence it ends.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        pieces.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    pieces.push(&text[start..]);

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_sentence() {
        let statements = segment("The Eiffel Tower is located in Paris.", 5);
        assert_eq!(statements, vec!["The Eiffel Tower is located in Paris."]);
    }

    #[test]
    fn test_multiple_sentences_keep_punctuation() {
        let statements = segment(
            "The Eiffel Tower is located in Paris. It was built in 1889. Python is a programming language.",
            5,
        );
        assert_eq!(
            statements,
            vec![
                "The Eiffel Tower is located in Paris.",
                "It was built in 1889.",
                "Python is a programming language.",
            ]
        );
    }

    #[test]
    fn test_unpunctuated_text_is_one_statement() {
        let statements = segment("Python is a programming language", 5);
        assert_eq!(statements, vec!["Python is a programming language"]);
    }

    #[test]
    fn test_newline_split_when_no_punctuation() {
        let statements = segment(
            "The moon landing happened in 1969\nWater boils at 100 degrees Celsius\n\n",
            5,
        );
        assert_eq!(
            statements,
            vec![
                "The moon landing happened in 1969",
                "Water boils at 100 degrees Celsius",
            ]
        );
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        let statements = segment("Pi is roughly 3.14 in value.", 5);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(segment("", 5).is_empty());
        assert!(segment("   \n\t ", 5).is_empty());
    }

    #[test]
    fn test_only_short_question_falls_back_to_whole_text() {
        assert_eq!(segment("What?", 5), vec!["What?"]);
    }

    #[test]
    fn test_long_question_is_accepted() {
        assert!(is_factual("What is Python?"));
        assert!(!is_factual("Is it?"));
        assert!(!is_factual("   "));
        assert!(is_factual("I think Python is great"));
    }

    #[test]
    fn test_short_question_excluded_when_cap_is_full() {
        let text = "Why? One is first. Two is second. Three is third. Four is fourth. Five is fifth.";
        let statements = segment(text, 5);

        assert_eq!(statements.len(), 5);
        assert!(!statements.iter().any(|s| s == "Why?"));
        assert_eq!(statements[0], "One is first.");
    }

    #[test]
    fn test_short_question_backfilled_in_original_order() {
        let statements = segment("Why? The sky is blue.", 5);
        assert_eq!(statements, vec!["Why?", "The sky is blue."]);
    }

    #[test]
    fn test_repeated_statements_are_kept() {
        let statements = segment("Cats purr. Cats purr. Huh?", 5);
        assert_eq!(statements, vec!["Cats purr.", "Cats purr.", "Huh?"]);
    }

    #[test]
    fn test_cap_applies() {
        let text = "A is one. B is two. C is three. D is four. E is five. F is six. G is seven.";
        let statements = segment(text, 5);
        assert_eq!(statements.len(), 5);
        assert_eq!(statements[4], "E is five.");
    }

    #[test]
    fn test_zero_cap_still_returns_content() {
        assert_eq!(segment("Some claim here.", 0).len(), 1);
        assert_eq!(Segmenter::new(0).max_statements(), 1);
    }

    #[test]
    fn test_segmenter_default_cap() {
        let segmenter = Segmenter::default();
        assert_eq!(segmenter.max_statements(), DEFAULT_MAX_STATEMENTS);
        let text = "1 a. 2 b. 3 c. 4 d. 5 e. 6 f.";
        assert_eq!(segmenter.segment(text).len(), 5);
    }

    proptest! {
        #[test]
        fn prop_non_empty_input_yields_bounded_ordered_statements(
            text in "[a-zA-Z?.! \n]{0,120}",
            cap in 1usize..8,
        ) {
            let statements = segment(&text, cap);

            if text.trim().is_empty() {
                prop_assert!(statements.is_empty());
            } else {
                prop_assert!(!statements.is_empty());
                prop_assert!(statements.len() <= cap);

                // Every statement is a trimmed slice of the input, in order.
                let mut cursor = 0;
                for statement in &statements {
                    prop_assert!(!statement.is_empty());
                    prop_assert_eq!(statement.trim(), statement.as_str());
                    let found = text[cursor..].find(statement.as_str());
                    prop_assert!(found.is_some(), "{:?} out of order in {:?}", statement, text);
                    cursor += found.unwrap() + statement.len();
                }
            }
        }
    }
}
