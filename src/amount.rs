//! Monetary amount detection.
//!
//! Recognizes currency-symbol and currency-word adjacent numbers:
//! - `₹1,00,000`, `Rs. 50,000/-`, `INR 2 lakh`
//! - `$5,000`, `USD 1.5 million`, `€200`, `£10k`
//! - `fifty thousand rupees` is not supported; `50 thousand rupees` is
//!
//! Values are normalized to a [`Decimal`] with Indian `lakh` / `crore`
//! multipliers applied.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    fn from_marker(marker: &str) -> Option<Self> {
        let lower = marker.to_lowercase();
        let currency = match lower.trim_end_matches('.') {
            "₹" | "rs" | "inr" | "rupee" | "rupees" => Currency::Inr,
            "$" | "us$" | "usd" | "dollar" | "dollars" => Currency::Usd,
            "€" | "eur" | "euro" | "euros" => Currency::Eur,
            "£" | "gbp" | "pound" | "pounds" => Currency::Gbp,
            _ => return None,
        };
        Some(currency)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A normalized monetary amount found in a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub clause_index: usize,
    pub value: Decimal,
    pub currency: Currency,
    /// Verbatim text of the amount
    pub text: String,
    /// Byte range within the clause text
    pub span: Range<usize>,
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static PREFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(₹|US\$|\$|€|£|\bRs\.?|\bINR\b|\bUSD\b|\bEUR\b|\bGBP\b)\s*(\d{1,3}(?:,\d{2,3})+(?:\.\d+)?|\d+(?:\.\d+)?)(?:\s*(thousand|k|lakhs?|lacs?|crores?|million|mn|billion|bn)\b)?(?:\s*/-)?",
    )
    .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SUFFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,3}(?:,\d{2,3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(thousand|lakhs?|lacs?|crores?|million|billion)?\s*(rupees?|dollars?|euros?|pounds?)\b",
    )
    .unwrap()
});

fn multiplier(word: &str) -> Option<Decimal> {
    let factor: i64 = match word.to_lowercase().as_str() {
        "thousand" | "k" => 1_000,
        "lakh" | "lakhs" | "lac" | "lacs" => 100_000,
        "million" | "mn" => 1_000_000,
        "crore" | "crores" => 10_000_000,
        "billion" | "bn" => 1_000_000_000,
        _ => return None,
    };
    Some(Decimal::from(factor))
}

fn normalize(number: &str, scale: Option<&str>) -> Option<Decimal> {
    let base = Decimal::from_str(&number.replace(',', "")).ok()?;
    match scale.and_then(multiplier) {
        Some(factor) => base.checked_mul(factor),
        None => Some(base),
    }
}

/// Detects monetary amounts in clause text.
#[derive(Debug, Default)]
pub struct AmountResolver;

impl AmountResolver {
    pub fn new() -> Self {
        Self
    }

    /// All amounts in `text`, ordered by position, without overlaps.
    pub fn find(&self, clause_index: usize, text: &str) -> Vec<MonetaryAmount> {
        let mut found: Vec<MonetaryAmount> = Vec::new();

        for caps in PREFIXED.captures_iter(text) {
            let (Some(whole), Some(marker), Some(number)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let (Some(currency), Some(value)) = (
                Currency::from_marker(marker.as_str()),
                normalize(number.as_str(), caps.get(3).map(|m| m.as_str())),
            ) else {
                continue;
            };
            found.push(MonetaryAmount {
                clause_index,
                value,
                currency,
                text: whole.as_str().trim_end().to_string(),
                span: whole.start()..whole.start() + whole.as_str().trim_end().len(),
            });
        }

        for caps in SUFFIXED.captures_iter(text) {
            let (Some(whole), Some(number), Some(word)) = (caps.get(0), caps.get(1), caps.get(3))
            else {
                continue;
            };
            let overlaps = found
                .iter()
                .any(|a| a.span.start < whole.end() && whole.start() < a.span.end);
            if overlaps {
                continue;
            }
            let (Some(currency), Some(value)) = (
                Currency::from_marker(word.as_str()),
                normalize(number.as_str(), caps.get(2).map(|m| m.as_str())),
            ) else {
                continue;
            };
            found.push(MonetaryAmount {
                clause_index,
                value,
                currency,
                text: whole.as_str().to_string(),
                span: whole.range(),
            });
        }

        found.sort_by_key(|a| a.span.start);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(text: &str) -> Vec<(Decimal, Currency, String)> {
        AmountResolver::new()
            .find(0, text)
            .into_iter()
            .map(|a| (a.value, a.currency, a.text))
            .collect()
    }

    #[test]
    fn rupee_symbol_and_indian_grouping() {
        assert_eq!(
            amounts("a penalty of ₹1,00,000 for breach"),
            vec![(Decimal::from(100_000), Currency::Inr, "₹1,00,000".to_string())]
        );
        assert_eq!(
            amounts("a penalty of ₹100,000 for breach"),
            vec![(Decimal::from(100_000), Currency::Inr, "₹100,000".to_string())]
        );
    }

    #[test]
    fn lakh_and_crore_multipliers() {
        assert_eq!(
            amounts("Rs. 5 lakh"),
            vec![(Decimal::from(500_000), Currency::Inr, "Rs. 5 lakh".to_string())]
        );
        assert_eq!(
            amounts("INR 2.5 crores"),
            vec![(Decimal::from(25_000_000), Currency::Inr, "INR 2.5 crores".to_string())]
        );
    }

    #[test]
    fn other_currencies() {
        assert_eq!(
            amounts("USD 1.5 million and €200"),
            vec![
                (Decimal::from(1_500_000), Currency::Usd, "USD 1.5 million".to_string()),
                (Decimal::from(200), Currency::Eur, "€200".to_string()),
            ]
        );
        assert_eq!(
            amounts("a fee of 500 dollars"),
            vec![(Decimal::from(500), Currency::Usd, "500 dollars".to_string())]
        );
    }

    #[test]
    fn trailing_slash_dash_is_part_of_amount() {
        let found = AmountResolver::new().find(3, "Rs. 50,000/- only");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].clause_index, 3);
        assert_eq!(found[0].text, "Rs. 50,000/-");
        assert_eq!(found[0].value, Decimal::from(50_000));
    }

    #[test]
    fn bare_numbers_are_not_amounts() {
        assert!(amounts("within 30 days of clause 4.2").is_empty());
    }
}
