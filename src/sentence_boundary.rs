//! Sentence boundary detection.
//!
//! Identifies sentence boundaries in text using punctuation patterns:
//! - Period, question mark, exclamation point
//! - Optionally semicolons (when `include_semicolons` is enabled)
//!
//! Abbreviations that would otherwise be false positives ("Mr.", "Pvt.",
//! "Rs.", "e.g.") and decimal points are filtered out.

use std::collections::HashSet;
use std::ops::Range;

/// A detected sentence boundary. `offset` is the byte position just past the
/// terminating punctuation (and any closing quote or bracket).
#[derive(Clone, PartialEq, Eq)]
pub struct SentenceBoundary {
    pub offset: usize,
    pub confidence: SentenceConfidence,
}

impl std::fmt::Debug for SentenceBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SentenceBoundary({}, {:?})", self.offset, self.confidence)
    }
}

/// Confidence level for a detected sentence boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceConfidence {
    /// Clear sentence boundary (punctuation + capital letter follows)
    High,
    /// Probable boundary (punctuation at end, but no following context)
    Medium,
    /// Possible boundary (lowercase continues; not used for splitting)
    Low,
}

/// Detects sentence boundaries in contract text.
pub struct SentenceBoundaryResolver {
    abbreviations: HashSet<String>,
    /// When true, treat semicolons as sentence boundaries
    include_semicolons: bool,
}

impl Default for SentenceBoundaryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceBoundaryResolver {
    pub fn new() -> Self {
        // Common abbreviations that should NOT be treated as sentence boundaries
        let common_abbrevs = [
            "dr", "mr", "mrs", "ms", "prof", "sr", "jr",
            "inc", "ltd", "pvt", "corp", "co", "llc", "llp",
            "e.g", "i.e", "viz", "vs", "etc", "approx",
            "u.s", "u.k", "p.m", "a.m",
            "no", "nos", "rs", "st", "dept", "fig",
            "sec", "cl", "art", "para", "sch",
        ];

        SentenceBoundaryResolver {
            abbreviations: common_abbrevs.iter().map(|a| a.to_string()).collect(),
            include_semicolons: false,
        }
    }

    /// Enable semicolon detection as sentence boundaries.
    ///
    /// Useful for contracts where semicolons separate independent clauses
    /// that function as separate obligations.
    pub fn with_semicolons(mut self) -> Self {
        self.include_semicolons = true;
        self
    }

    pub fn with_custom_abbreviations(mut self, abbreviations: &[&str]) -> Self {
        for abbrev in abbreviations {
            self.abbreviations.insert(abbrev.to_lowercase());
        }
        self
    }

    fn is_sentence_ending_punctuation(&self, c: char) -> bool {
        matches!(c, '.' | '?' | '!') || (self.include_semicolons && c == ';')
    }

    fn is_abbreviation(&self, token: &str) -> bool {
        let normalized = token
            .trim_start_matches(|c: char| matches!(c, '(' | '"' | '\'' | '“' | '‘'))
            .trim_end_matches('.')
            .to_lowercase();
        if self.abbreviations.contains(&normalized) {
            return true;
        }
        // Single-letter initials: "J. Smith"
        let mut chars = normalized.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    }

    /// All candidate boundaries in `text`, in order.
    pub fn boundaries(&self, text: &str) -> Vec<SentenceBoundary> {
        let mut found = Vec::new();

        for (pos, c) in text.char_indices() {
            if !self.is_sentence_ending_punctuation(c) {
                continue;
            }

            let mut end = pos + c.len_utf8();
            let rest = &text[end..];
            let closing: usize = rest
                .chars()
                .take_while(|ch| matches!(ch, '"' | '\'' | '”' | '’' | ')' | ']'))
                .map(char::len_utf8)
                .sum();
            end += closing;

            // "3.5", "e.g.x", "www.site" are not boundaries
            match text[end..].chars().next() {
                Some(next) if !next.is_whitespace() => continue,
                _ => {}
            }

            if c == '.' {
                let token = text[..pos]
                    .rsplit(char::is_whitespace)
                    .next()
                    .unwrap_or_default();
                if self.is_abbreviation(token) {
                    continue;
                }
                // Leading enumerator: "1. The Vendor shall..."
                let leading = text[..pos - token.len()].trim().is_empty();
                if leading && !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
                    continue;
                }
            }

            let confidence = match text[end..].trim_start().chars().next() {
                None => SentenceConfidence::Medium,
                Some(next) if next.is_lowercase() => SentenceConfidence::Low,
                Some(_) => SentenceConfidence::High,
            };

            found.push(SentenceBoundary {
                offset: end,
                confidence,
            });
        }

        found
    }

    /// Split `text` into sentence ranges covering the whole input.
    /// Only High and Medium confidence boundaries split.
    pub fn split(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;

        for boundary in self.boundaries(text) {
            if boundary.confidence == SentenceConfidence::Low {
                continue;
            }
            ranges.push(start..boundary.offset);
            start = boundary.offset;
        }
        if start < text.len() {
            ranges.push(start..text.len());
        }

        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        SentenceBoundaryResolver::new()
            .split(text)
            .into_iter()
            .map(|r| text[r].trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[test]
    fn splits_plain_sentences() {
        assert_eq!(
            sentences("The Tenant shall pay rent. The Landlord may inspect."),
            vec!["The Tenant shall pay rent.", "The Landlord may inspect."]
        );
    }

    #[test]
    fn skips_abbreviations_and_decimals() {
        assert_eq!(
            sentences("ABC Pvt. Ltd. shall pay Rs. 5,000.50 to Mr. Rao. Payment is due monthly."),
            vec![
                "ABC Pvt. Ltd. shall pay Rs. 5,000.50 to Mr. Rao.",
                "Payment is due monthly."
            ]
        );
        assert_eq!(
            sentences("Fees, e.g. filing fees, are excluded. See clause No. 4 below."),
            vec!["Fees, e.g. filing fees, are excluded.", "See clause No. 4 below."]
        );
    }

    #[test]
    fn leading_enumerator_is_not_a_sentence() {
        assert_eq!(
            sentences("1. The Vendor shall deliver. The Buyer shall pay."),
            vec!["1. The Vendor shall deliver.", "The Buyer shall pay."]
        );
    }

    #[test]
    fn lowercase_continuation_does_not_split() {
        let resolver = SentenceBoundaryResolver::new();
        let text = "Payment is due on receipt. and not later.";
        let boundaries = resolver.boundaries(text);
        assert_eq!(boundaries[0].confidence, SentenceConfidence::Low);
        assert_eq!(sentences(text), vec![text]);
    }

    #[test]
    fn closing_quote_stays_with_sentence() {
        assert_eq!(
            sentences("It is called the \"Term.\" It begins today."),
            vec!["It is called the \"Term.\"", "It begins today."]
        );
    }

    #[test]
    fn semicolons_when_enabled() {
        let text = "The Vendor shall deliver; the Buyer shall pay.";
        let resolver = SentenceBoundaryResolver::new().with_semicolons();
        assert_eq!(resolver.split(text).len(), 1);
        let text = "The Vendor shall deliver; The Buyer shall pay.";
        assert_eq!(resolver.split(text).len(), 2);
    }
}
