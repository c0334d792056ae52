//! Best-evidence selection for a statement.
//!
//! Every evidence item with a non-empty snippet is scored; the highest
//! score wins. Comparison is strict `>`, so among equal scores the item the
//! search provider returned first is kept. If no item beats 0.0 the
//! statement has no best snippet or URL.

use serde::{Deserialize, Serialize};

use crate::confidence::classify;
use crate::types::{ClaimResult, EvidenceItem};

/// Scores are reported with this many decimal digits.
pub const SCORE_DECIMALS: i32 = 4;

/// A statement paired with its best-matching evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvidence {
    pub statement: String,
    pub best_snippet: Option<String>,
    pub best_url: Option<String>,

    /// Maximum similarity over all scorable items, unrounded.
    pub similarity: f64,
}

impl ScoredEvidence {
    /// Classify and round into a [`ClaimResult`].
    pub fn into_claim_result(self) -> ClaimResult {
        ClaimResult {
            confidence: classify(self.similarity),
            similarity: round_score(self.similarity),
            statement: self.statement,
            best_snippet: self.best_snippet,
            best_url: self.best_url,
        }
    }
}

/// Running maximum over scored evidence items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestMatch {
    similarity: f64,
    snippet: Option<String>,
    url: Option<String>,
}

impl BestMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a scored item. Returns true if it became the new best.
    ///
    /// Items without a scorable snippet are ignored.
    pub fn consider(&mut self, item: &EvidenceItem, score: f64) -> bool {
        let Some(snippet) = item.scorable_snippet() else {
            return false;
        };

        if score > self.similarity {
            self.similarity = score;
            self.snippet = Some(snippet.to_string());
            self.url = item.url.clone();
            true
        } else {
            false
        }
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// Attach the statement and finish.
    pub fn finish(self, statement: impl Into<String>) -> ScoredEvidence {
        ScoredEvidence {
            statement: statement.into(),
            best_snippet: self.snippet,
            best_url: self.url,
            similarity: self.similarity,
        }
    }
}

/// Round a score to [`SCORE_DECIMALS`] places.
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}

/// Select the best evidence for a statement with a synchronous scorer.
///
/// The async pipeline drives [`BestMatch`] directly; this is the same rule
/// for callers that already have a scoring function at hand.
pub fn select_best<F>(statement: &str, items: &[EvidenceItem], mut score: F) -> ScoredEvidence
where
    F: FnMut(&str, &str) -> f64,
{
    let mut best = BestMatch::new();
    for item in items {
        if let Some(snippet) = item.scorable_snippet() {
            let similarity = score(statement, snippet);
            best.consider(item, similarity);
        }
    }
    best.finish(statement)
}
