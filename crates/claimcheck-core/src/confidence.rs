//! Confidence classification.
//!
//! Thresholds are fixed, with inclusive lower bounds:
//! - `similarity >= 0.8` → High
//! - `0.5 <= similarity < 0.8` → Medium
//! - otherwise (including NaN) → Low

use crate::types::Confidence;

/// Lower bound for High confidence.
pub const HIGH_THRESHOLD: f64 = 0.8;

/// Lower bound for Medium confidence.
pub const MEDIUM_THRESHOLD: f64 = 0.5;

/// Map a similarity score to a confidence tier.
pub fn classify(similarity: f64) -> Confidence {
    if similarity >= HIGH_THRESHOLD {
        Confidence::High
    } else if similarity >= MEDIUM_THRESHOLD {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries_are_exact() {
        assert_eq!(classify(0.8), Confidence::High);
        assert_eq!(classify(0.7999), Confidence::Medium);
        assert_eq!(classify(0.5), Confidence::Medium);
        assert_eq!(classify(0.4999), Confidence::Low);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(classify(1.0), Confidence::High);
        assert_eq!(classify(0.0), Confidence::Low);
        assert_eq!(classify(-3.0), Confidence::Low);
        assert_eq!(classify(f64::NAN), Confidence::Low);
        assert_eq!(classify(f64::INFINITY), Confidence::High);
    }

    proptest! {
        #[test]
        fn prop_monotonic(a in -1.0f64..2.0, b in -1.0f64..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }
    }
}
