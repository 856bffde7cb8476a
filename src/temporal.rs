//! Temporal expression detection for contract text.
//!
//! Detects two kinds of expressions:
//!
//! - **Durations**: "90 days", "thirty (30) days", "two (2) years", "six months"
//! - **Dates**: "2024-01-15", "15/01/2024", "15 January 2024", "January 15, 2024"
//!
//! Dates are normalized to ISO form when the calendar reading is unambiguous;
//! otherwise the raw text is kept and the date is flagged low-confidence.

use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Unit of time for durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
    Years,
    BusinessDays,
}

impl DurationUnit {
    fn from_text(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "day" | "days" => Some(DurationUnit::Days),
            "week" | "weeks" => Some(DurationUnit::Weeks),
            "month" | "months" => Some(DurationUnit::Months),
            "year" | "years" => Some(DurationUnit::Years),
            _ => None,
        }
    }

    /// Check if text is a business/working days prefix
    fn is_business_prefix(text: &str) -> bool {
        matches!(text.to_lowercase().as_str(), "business" | "working")
    }

    /// Approximate length of one unit in calendar days.
    pub fn approx_days(self) -> f64 {
        match self {
            DurationUnit::Days => 1.0,
            DurationUnit::BusinessDays => 1.4,
            DurationUnit::Weeks => 7.0,
            DurationUnit::Months => 30.0,
            DurationUnit::Years => 365.0,
        }
    }
}

/// A period of time: "two (2) years".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationExpression {
    pub clause_index: usize,
    pub value: u32,
    pub unit: DurationUnit,
    /// Written form if present, e.g., "thirty" in "thirty (30) days"
    pub written_form: Option<String>,
    pub text: String,
    /// Byte range within the clause text
    pub span: Range<usize>,
}

impl DurationExpression {
    pub fn to_approx_days(&self) -> f64 {
        f64::from(self.value) * self.unit.approx_days()
    }
}

/// A calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateExpression {
    pub clause_index: usize,
    pub text: String,
    /// Byte range within the clause text
    pub span: Range<usize>,
    /// ISO form when the reading is unambiguous and valid
    pub iso: Option<NaiveDate>,
    pub low_confidence: bool,
}

const WRITTEN_NUMBERS: [(&str, u32); 20] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("fifteen", 15),
    ("eighteen", 18),
    ("twenty", 20),
    ("twenty-four", 24),
    ("thirty", 30),
    ("forty-five", 45),
    ("sixty", 60),
    ("ninety", 90),
];

fn written_number(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    WRITTEN_NUMBERS
        .iter()
        .find(|(w, _)| *w == lower)
        .map(|(_, n)| *n)
}

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(\d{1,4})|(one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fifteen|eighteen|twenty-four|twenty|thirty|forty-five|sixty|ninety))(?:\s*\((\d{1,4})\))?[\s\-]+(?:(business|working)\s+)?(days?|weeks?|months?|years?)\b",
    )
    .unwrap()
});

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})([/.\-])(\d{1,2})([/.\-])(\d{4}|\d{2})\b").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+day\s+of)?\s+{MONTHS}\.?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTHS}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Detects durations and dates in clause text.
#[derive(Debug, Default)]
pub struct TemporalResolver;

impl TemporalResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn durations(&self, clause_index: usize, text: &str) -> Vec<DurationExpression> {
        let mut found = Vec::new();

        for caps in DURATION.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let written = caps.get(2).map(|m| m.as_str().to_string());
            // "thirty (30) days": the parenthesized digits are authoritative
            let value = caps
                .get(3)
                .or_else(|| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .or_else(|| written.as_deref().and_then(written_number));
            let business = caps
                .get(4)
                .map_or(false, |m| DurationUnit::is_business_prefix(m.as_str()));
            let unit = caps.get(5).and_then(|m| DurationUnit::from_text(m.as_str()));

            let (Some(value), Some(unit)) = (value, unit) else {
                continue;
            };
            let unit = match unit {
                DurationUnit::Days if business => DurationUnit::BusinessDays,
                other => other,
            };

            found.push(DurationExpression {
                clause_index,
                value,
                unit,
                written_form: written,
                text: whole.as_str().to_string(),
                span: whole.range(),
            });
        }

        found
    }

    pub fn dates(&self, clause_index: usize, text: &str) -> Vec<DateExpression> {
        let mut found: Vec<DateExpression> = Vec::new();
        let mut push = |span: Range<usize>, iso: Option<NaiveDate>, low_confidence: bool| {
            if found
                .iter()
                .any(|d| d.span.start < span.end && span.start < d.span.end)
            {
                return;
            }
            found.push(DateExpression {
                clause_index,
                text: text[span.clone()].to_string(),
                span,
                iso,
                low_confidence: low_confidence || iso.is_none(),
            });
        };

        for caps in ISO_DATE.captures_iter(text) {
            let date = ymd(&caps[1], &caps[2], &caps[3]);
            push(caps_range(&caps), date, false);
        }

        for caps in DAY_MONTH_YEAR.captures_iter(text) {
            let date = month_number(&caps[2])
                .and_then(|m| ymd(&caps[3], &m.to_string(), &caps[1]));
            push(caps_range(&caps), date, false);
        }

        for caps in MONTH_DAY_YEAR.captures_iter(text) {
            let date = month_number(&caps[1])
                .and_then(|m| ymd(&caps[3], &m.to_string(), &caps[2]));
            push(caps_range(&caps), date, false);
        }

        for caps in NUMERIC_DATE.captures_iter(text) {
            // "4.2.1" style section numbers mix separators rarely; require matching ones
            if caps[2] != caps[4] {
                continue;
            }
            let (Ok(first), Ok(second)) = (caps[1].parse::<u32>(), caps[3].parse::<u32>()) else {
                continue;
            };
            let year = &caps[5];
            let (day, month, ambiguous) = if first > 12 {
                (first, second, false)
            } else if second > 12 {
                (second, first, false)
            } else {
                // Day-first reading; only certain when both parts agree
                (first, second, first != second)
            };
            let two_digit_year = year.len() == 2;
            let date = if ambiguous || two_digit_year {
                None
            } else {
                ymd(year, &month.to_string(), &day.to_string())
            };
            push(caps_range(&caps), date, ambiguous || two_digit_year);
        }

        found.sort_by_key(|d| d.span.start);
        found
    }
}

fn caps_range(caps: &regex::Captures<'_>) -> Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(text: &str) -> Vec<(u32, DurationUnit)> {
        TemporalResolver::new()
            .durations(0, text)
            .into_iter()
            .map(|d| (d.value, d.unit))
            .collect()
    }

    #[test]
    fn numeric_and_written_durations() {
        assert_eq!(durations("for 2 years after termination"), vec![(2, DurationUnit::Years)]);
        assert_eq!(durations("within 90 days"), vec![(90, DurationUnit::Days)]);
        assert_eq!(durations("six months' notice"), vec![(6, DurationUnit::Months)]);
        assert_eq!(durations("a 12-month term"), vec![(12, DurationUnit::Months)]);
    }

    #[test]
    fn written_with_parenthesized_digits() {
        let found = TemporalResolver::new().durations(0, "for a period of two (2) years");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 2);
        assert_eq!(found[0].unit, DurationUnit::Years);
        assert_eq!(found[0].written_form.as_deref(), Some("two"));
        assert_eq!(found[0].text, "two (2) years");
        assert_eq!(found[0].to_approx_days(), 730.0);
    }

    #[test]
    fn business_days() {
        assert_eq!(
            durations("within 10 business days"),
            vec![(10, DurationUnit::BusinessDays)]
        );
    }

    #[test]
    fn unambiguous_dates_normalize() {
        let resolver = TemporalResolver::new();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        for text in ["2024-01-15", "15/01/2024", "15 January 2024", "January 15, 2024", "15th day of January, 2024"] {
            let found = resolver.dates(0, text);
            assert_eq!(found.len(), 1, "{text}");
            assert_eq!(found[0].iso, expected, "{text}");
            assert!(!found[0].low_confidence, "{text}");
        }
    }

    #[test]
    fn ambiguous_dates_keep_raw_text() {
        let found = TemporalResolver::new().dates(0, "signed on 03/04/2024");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "03/04/2024");
        assert_eq!(found[0].iso, None);
        assert!(found[0].low_confidence);
    }

    #[test]
    fn invalid_calendar_dates_are_low_confidence() {
        let found = TemporalResolver::new().dates(0, "31/02/2024");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].iso, None);
        assert!(found[0].low_confidence);
    }
}
