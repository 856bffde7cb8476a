//! `Scored<T>` infrastructure for confidence-bearing extraction results.
//!
//! The [`Scored<T>`] wrapper represents values with associated confidence scores.
//! - `confidence = 1.0` means the value is certain
//! - `confidence < 1.0` means the value came from a heuristic and may be wrong
//!
//! Scores can come from different sources tracked via [`ScoreSource`]:
//! - Rule-based formulas (keyword votes, pattern matches)
//! - Derived from other scores

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value with an associated confidence score.
///
/// # Example
/// ```
/// use contract_risk::{Scored, ScoreSource};
///
/// let kind = Scored::rule_based("Employment", 0.4, "weighted_vote");
/// assert!(!kind.is_certain());
///
/// let fixed = Scored::derived("Unknown", 1.0);
/// assert!(fixed.is_certain());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Scored<T> {
    /// The actual value
    pub value: T,
    /// Confidence score from 0.0 to 1.0
    pub confidence: f64,
    /// Where this score came from
    pub source: ScoreSource,
}

/// The source of a confidence score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreSource {
    /// Score produced by a rule-based formula
    RuleBased {
        /// Name of the rule that produced this score
        rule_name: String,
    },
    /// Score derived from combining other scores
    Derived,
}

impl<T> Scored<T> {
    /// Create a new scored value with explicit confidence and source.
    pub fn new(value: T, confidence: f64, source: ScoreSource) -> Self {
        Self {
            value,
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    /// Create a scored value from a rule-based formula.
    pub fn rule_based(value: T, confidence: f64, rule_name: &str) -> Self {
        Self::new(
            value,
            confidence,
            ScoreSource::RuleBased {
                rule_name: rule_name.to_string(),
            },
        )
    }

    /// Create a derived scored value (from combining other scores).
    pub fn derived(value: T, confidence: f64) -> Self {
        Self::new(value, confidence, ScoreSource::Derived)
    }

    /// Returns true if the confidence is exactly 1.0.
    pub fn is_certain(&self) -> bool {
        (self.confidence - 1.0).abs() < f64::EPSILON
    }

    /// Map the inner value while preserving confidence and source.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Scored<U> {
        Scored {
            value: f(self.value),
            confidence: self.confidence,
            source: self.source,
        }
    }

    /// Get a reference to the inner value.
    pub fn as_ref(&self) -> Scored<&T> {
        Scored {
            value: &self.value,
            confidence: self.confidence,
            source: self.source.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Scored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact format for snapshot tests: Scored(value, conf: 0.85)
        write!(f, "Scored({:?}, conf: {:.2})", self.value, self.confidence)
    }
}

impl<T: PartialEq> PartialEq for Scored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && (self.confidence - other.confidence).abs() < f64::EPSILON
            && self.source == other.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_based_score() {
        let scored = Scored::rule_based("test", 0.75, "my_rule");
        assert_eq!(scored.confidence, 0.75);
        assert!(!scored.is_certain());
        assert!(matches!(
            scored.source,
            ScoreSource::RuleBased { rule_name } if rule_name == "my_rule"
        ));
    }

    #[test]
    fn test_confidence_clamping() {
        let high = Scored::rule_based("test", 1.5, "rule");
        assert_eq!(high.confidence, 1.0);
        assert!(high.is_certain());

        let low = Scored::rule_based("test", -0.5, "rule");
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_map() {
        let scored = Scored::rule_based(42, 0.8, "rule");
        let mapped = scored.map(|x| x.to_string());
        assert_eq!(mapped.value, "42");
        assert_eq!(mapped.confidence, 0.8);
    }

    #[test]
    fn test_debug_format() {
        let scored = Scored::rule_based("Employment", 0.85, "weighted_vote");
        let debug = format!("{:?}", scored);
        assert_eq!(debug, r#"Scored("Employment", conf: 0.85)"#);
    }
}
