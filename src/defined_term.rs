//! Defined term detection.
//!
//! Identifies formally defined terms in contract text using patterns:
//! - `"Term" means ...` - Quoted term followed by "means"
//! - `ABC Corp (the "Term")` - Parenthetical definition
//! - `ABC Corp, hereinafter referred to as "Term"` - Hereinafter pattern
//!
//! The capitalized span immediately before a parenthetical or hereinafter
//! definition is kept as the term's referent ("ABC Corp").

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Scored;

/// Represents a formally defined term in a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedTerm {
    /// The term name as it appears in quotes (e.g., "Contractor")
    pub term_name: String,
    /// How this term was defined
    pub definition_type: DefinitionType,
    /// The named entity the term stands for, when one precedes the definition
    pub referent: Option<String>,
    /// Byte range of the whole definition in the clause text
    pub span: Range<usize>,
}

/// The type of formal definition pattern detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionType {
    /// Pattern: "Term" means ... (quoted term followed by means keyword)
    /// Example: "Company" means ABC Corporation
    QuotedMeans,

    /// Pattern: ABC Corp (the "Term") - parenthetical definition
    /// Example: ABC Corporation (the "Company")
    Parenthetical,

    /// Pattern: ABC Corp, hereinafter "Term" - hereinafter pattern
    /// Example: ABC Corporation, hereinafter referred to as the "Contractor"
    Hereinafter,
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static QUOTED_MEANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["“]([^"“”]{1,60})["”]\s+(?:shall\s+mean|means|refers\s+to|shall\s+have\s+the\s+meaning)"#)
        .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\(\s*(?:the\s+|a\s+|an\s+)?["“]([^"“”]{1,60})["”]\s*\)"#).unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static HEREINAFTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\(?\s*\b(?:hereinafter|hereafter)\b[\s,]*(?:(?:referred\s+to\s+as|called|known\s+as)\s+)?(?:the\s+)?["“]([^"“”]{1,60})["”]\s*\)?"#,
    )
    .unwrap()
});

/// Capitalized multi-token span ending right before a definition.
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static REFERENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][\w&.\-]*(?:\s+(?:[A-Z][\w&.\-]*|of|and|&))*)[\s,]*$").unwrap()
});

/// Detects formally defined terms in contract text.
pub struct DefinedTermResolver {
    /// Base confidence for QuotedMeans pattern (highest - most explicit)
    quoted_means_confidence: f64,
    /// Base confidence for Parenthetical pattern
    parenthetical_confidence: f64,
    /// Base confidence for Hereinafter pattern
    hereinafter_confidence: f64,
}

impl Default for DefinedTermResolver {
    fn default() -> Self {
        Self {
            quoted_means_confidence: 0.95,
            parenthetical_confidence: 0.90,
            hereinafter_confidence: 0.90,
        }
    }
}

impl DefinedTermResolver {
    /// Create a new resolver with default confidence scores.
    pub fn new() -> Self {
        Self::default()
    }

    /// All definitions in `text`, in order of appearance.
    pub fn find(&self, text: &str) -> Vec<Scored<DefinedTerm>> {
        let mut found: Vec<Scored<DefinedTerm>> = Vec::new();

        for caps in HEREINAFTER.captures_iter(text) {
            let (Some(whole), Some(term)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            found.push(Scored::rule_based(
                DefinedTerm {
                    term_name: term.as_str().trim().to_string(),
                    definition_type: DefinitionType::Hereinafter,
                    referent: referent_before(&text[..whole.start()]),
                    span: whole.range(),
                },
                self.hereinafter_confidence,
                "hereinafter",
            ));
        }

        for caps in PARENTHETICAL.captures_iter(text) {
            let (Some(whole), Some(term)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if overlaps_any(&found, &whole.range()) {
                continue;
            }
            found.push(Scored::rule_based(
                DefinedTerm {
                    term_name: term.as_str().trim().to_string(),
                    definition_type: DefinitionType::Parenthetical,
                    referent: referent_before(&text[..whole.start()]),
                    span: whole.range(),
                },
                self.parenthetical_confidence,
                "parenthetical",
            ));
        }

        for caps in QUOTED_MEANS.captures_iter(text) {
            let (Some(whole), Some(term)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if overlaps_any(&found, &whole.range()) {
                continue;
            }
            found.push(Scored::rule_based(
                DefinedTerm {
                    term_name: term.as_str().trim().to_string(),
                    definition_type: DefinitionType::QuotedMeans,
                    referent: None,
                    span: whole.range(),
                },
                self.quoted_means_confidence,
                "quoted_means",
            ));
        }

        found.sort_by_key(|t| t.value.span.start);
        found
    }
}

fn overlaps_any(found: &[Scored<DefinedTerm>], range: &Range<usize>) -> bool {
    found
        .iter()
        .any(|t| t.value.span.start < range.end && range.start < t.value.span.end)
}

fn referent_before(prefix: &str) -> Option<String> {
    let caps = REFERENT.captures(prefix)?;
    let name = caps.get(1)?.as_str().trim_end_matches(',').trim();
    (!name.is_empty()).then(|| name.to_string())
}
