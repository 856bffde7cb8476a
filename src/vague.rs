//! Vague language detection.
//!
//! Flags phrases whose meaning is left to later dispute: "best efforts",
//! "as soon as possible", "material", ...

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A vague phrase found in a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VagueTerm {
    pub clause_index: usize,
    /// The phrase as listed, lowercased
    pub phrase: String,
    /// Byte range within the clause text
    pub span: Range<usize>,
}

const VAGUE_PHRASES: [&str; 11] = [
    "commercially reasonable",
    "reasonable efforts",
    "best efforts",
    "as soon as possible",
    "from time to time",
    "in due course",
    "material",
    "substantial",
    "significant",
    "satisfactory",
    "appropriate",
];

#[allow(clippy::unwrap_used)] // Built from constant phrases
static VAGUE: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = VAGUE_PHRASES
        .iter()
        .map(|p| p.replace(' ', r"\s+"))
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).unwrap()
});

#[derive(Debug, Default)]
pub struct VagueTermResolver;

impl VagueTermResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn find(&self, clause_index: usize, text: &str) -> Vec<VagueTerm> {
        VAGUE
            .find_iter(text)
            .map(|m| VagueTerm {
                clause_index,
                phrase: m
                    .as_str()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase(),
                span: m.range(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_vague_phrases() {
        let found = VagueTermResolver::new().find(
            2,
            "The Supplier shall use commercially reasonable efforts to deliver as soon as possible.",
        );
        let phrases: Vec<&str> = found.iter().map(|v| v.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["commercially reasonable", "as soon as possible"]);
        assert!(found.iter().all(|v| v.clause_index == 2));
    }

    #[test]
    fn whole_words_only() {
        assert!(VagueTermResolver::new()
            .find(0, "All raw materials are inappropriately stored.")
            .is_empty());
        assert_eq!(
            VagueTermResolver::new().find(0, "any Material breach")[0].phrase,
            "material"
        );
    }
}
