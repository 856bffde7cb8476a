//! Heading marker detection for contract structure.
//!
//! Detects markers at the start of a line:
//! - Numbered headings: `1.`, `1.1`, `12.3.4`, `7)`
//! - Parenthesized letters: (a), (b), (c)
//! - Parenthesized roman numerals: (i), (ii), (iii)
//! - Parenthesized digits: (1), (2), (3)
//! - Bare letters: a), b)
//! - Section words: `Section 4`, `ARTICLE IV`, `Clause 7`
//! - Recitals: `WHEREAS`, `NOW THEREFORE`
//! - Upper-case headings ending in a colon: `TERMINATION:`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::parse_roman;

/// Represents the different heading styles found in contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListMarker {
    /// Parenthesized letter marker like (a), (b), (c) or a bare `a)`
    ParenthesizedLetter { letter: char },
    /// Parenthesized roman numeral like (i), (ii), (iii)
    ParenthesizedRoman { numeral: String, value: u32 },
    /// Parenthesized digit like (1), (2), (3)
    ParenthesizedDigit { digit: u32 },
    /// Dotted number like `1.`, `4.2`, `12.3.4`
    Numbered { label: String },
    /// `Section 4`, `Article IV`, `Clause 7`
    Section { label: String },
    /// `WHEREAS` / `NOW THEREFORE`
    Recital,
    /// `TERMINATION:`
    CapitalHeading { title: String },
}

/// A marker together with the byte length it occupies at the start of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub marker: ListMarker,
    pub len: usize,
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}(?:\.\d{1,3})+)\.?\s|^(\d{1,3})[.)]\s").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([A-Za-z]{1,5}|\d{1,3})\)").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static BARE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z])\)\s").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:Section|SECTION|Article|ARTICLE|Clause|CLAUSE)\s+(\d{1,3}(?:\.\d{1,3})*|[IVXLC]{1,7})\b\.?",
    )
    .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static RECITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:WHEREAS|NOW,?\s+THEREFORE)\b,?").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CAPITAL_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9 &/\-]{2,60}):").unwrap());

/// Detects heading markers at the start of a line.
#[derive(Debug, Default)]
pub struct ListMarkerResolver;

impl ListMarkerResolver {
    pub fn new() -> Self {
        Self
    }

    /// Check if a string is a roman numeral commonly used in legal lists.
    fn is_roman_numeral(s: &str) -> bool {
        const COMMON_NUMERALS: [&str; 30] = [
            "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii",
            "xiv", "xv", "xvi", "xvii", "xviii", "xix", "xx", "xxi", "xxii", "xxiii", "xxiv",
            "xxv", "xxvi", "xxvii", "xxviii", "xxix", "xxx",
        ];
        COMMON_NUMERALS.contains(&s.to_lowercase().as_str())
    }

    /// Detect a marker at the start of `line`. Leading whitespace is not skipped.
    pub fn detect(&self, line: &str) -> Option<MarkerMatch> {
        if let Some(caps) = SECTION.captures(line) {
            return Some(MarkerMatch {
                marker: ListMarker::Section {
                    label: caps[1].to_string(),
                },
                len: caps[0].len(),
            });
        }

        if let Some(m) = RECITAL.find(line) {
            return Some(MarkerMatch {
                marker: ListMarker::Recital,
                len: m.end(),
            });
        }

        if let Some(caps) = NUMBERED.captures(line) {
            let label = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
            return Some(MarkerMatch {
                marker: ListMarker::Numbered { label },
                len: caps[0].trim_end().len(),
            });
        }

        if let Some(caps) = PARENTHESIZED.captures(line) {
            let content = &caps[1];
            let len = caps[0].len();
            // Roman numerals before single letters: 'i', 'v', 'x' are roman
            let marker = if Self::is_roman_numeral(content) {
                let (value, _) = parse_roman(content)?;
                ListMarker::ParenthesizedRoman {
                    numeral: content.to_lowercase(),
                    value,
                }
            } else if let Ok(digit) = content.parse::<u32>() {
                ListMarker::ParenthesizedDigit { digit }
            } else {
                let mut chars = content.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) => ListMarker::ParenthesizedLetter {
                        letter: letter.to_ascii_lowercase(),
                    },
                    _ => return None,
                }
            };
            return Some(MarkerMatch { marker, len });
        }

        if let Some(caps) = BARE_LETTER.captures(line) {
            let letter = caps[1].chars().next()?;
            return Some(MarkerMatch {
                marker: ListMarker::ParenthesizedLetter { letter },
                len: caps[0].trim_end().len(),
            });
        }

        if let Some(caps) = CAPITAL_HEADING.captures(line) {
            let title = caps[1].trim();
            if title.chars().any(|c| c.is_ascii_alphabetic()) {
                return Some(MarkerMatch {
                    marker: ListMarker::CapitalHeading {
                        title: title.to_string(),
                    },
                    len: caps[0].len(),
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(line: &str) -> Option<ListMarker> {
        ListMarkerResolver::new().detect(line).map(|m| m.marker)
    }

    #[test]
    fn test_numbered() {
        assert_eq!(
            marker("1. Definitions"),
            Some(ListMarker::Numbered { label: "1".into() })
        );
        assert_eq!(
            marker("12.3.4 Payment terms"),
            Some(ListMarker::Numbered {
                label: "12.3.4".into()
            })
        );
        assert_eq!(
            marker("4.2. Notice"),
            Some(ListMarker::Numbered { label: "4.2".into() })
        );
        assert_eq!(marker("2024 was a year"), None);
        assert_eq!(marker("3.5 percent"), Some(ListMarker::Numbered { label: "3.5".into() }));
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(
            marker("(a) the Services"),
            Some(ListMarker::ParenthesizedLetter { letter: 'a' })
        );
        assert_eq!(
            marker("(iv) any fees"),
            Some(ListMarker::ParenthesizedRoman {
                numeral: "iv".into(),
                value: 4
            })
        );
        assert_eq!(
            marker("(3) Employer may"),
            Some(ListMarker::ParenthesizedDigit { digit: 3 })
        );
        assert_eq!(
            marker("b) the Tenant"),
            Some(ListMarker::ParenthesizedLetter { letter: 'b' })
        );
        assert_eq!(marker("(the \"Company\")"), None);
    }

    #[test]
    fn test_section_words() {
        assert_eq!(
            marker("Section 4. Term"),
            Some(ListMarker::Section { label: "4".into() })
        );
        assert_eq!(
            marker("ARTICLE IV"),
            Some(ListMarker::Section { label: "IV".into() })
        );
        assert_eq!(
            marker("Clause 7.1 Notices"),
            Some(ListMarker::Section { label: "7.1".into() })
        );
        assert_eq!(marker("Sectional furniture"), None);
    }

    #[test]
    fn test_recitals_and_capital_headings() {
        assert_eq!(marker("WHEREAS the Company"), Some(ListMarker::Recital));
        assert_eq!(marker("NOW, THEREFORE, the parties"), Some(ListMarker::Recital));
        assert_eq!(
            marker("TERMINATION: Either party"),
            Some(ListMarker::CapitalHeading {
                title: "TERMINATION".into()
            })
        );
        assert_eq!(marker("Note: this is prose"), None);
    }

    #[test]
    fn test_marker_length() {
        let m = ListMarkerResolver::new().detect("(a) text").unwrap();
        assert_eq!(m.len, 3);
        let m = ListMarkerResolver::new().detect("1.1 text").unwrap();
        assert_eq!(m.len, 3);
    }
}
