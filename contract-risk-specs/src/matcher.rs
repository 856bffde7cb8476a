//! Field matching for fixture assertions.
//!
//! Every assertion kind observes zero or more candidates in the assessment
//! (findings overlapping a span, the clause containing it, the document
//! itself). Each candidate is a flat list of named fields rendered as text;
//! an assertion passes when any candidate satisfies all of its field checks.

use crate::fixture::{Assertion, CompareOp, FieldCheck};

/// Named field values of one observed candidate.
pub type Observation = Vec<(&'static str, String)>;

/// Assertion kinds the runner understands.
pub const SUPPORTED_TYPES: [&str; 10] = [
    "Finding", "NoFinding", "Clause", "Amount", "Duration", "Date", "Vague", "Provision", "Party",
    "Term",
];

/// Valid field names for a given assertion kind.
pub fn valid_fields_for_type(span_type: &str) -> &'static [&'static str] {
    match span_type {
        "Finding" | "NoFinding" => &[
            "category",
            "severity",
            "base_severity",
            "text",
            "clause",
            "adjusted_by",
        ],
        "Clause" => &["index", "role", "topic", "severity", "ambiguous", "findings", "text"],
        "Amount" => &["value", "currency", "text", "clause"],
        "Duration" => &["value", "unit", "days", "text", "clause"],
        "Date" => &["iso", "low_confidence", "text", "clause"],
        "Vague" => &["phrase", "clause"],
        "Provision" => &["kind", "text", "clause"],
        "Party" => &["name", "role", "alias"],
        "Term" => &["name", "type", "referent"],
        "Document" => &[
            "contract_type",
            "type_confidence",
            "score",
            "level",
            "clauses",
            "findings",
            "high_findings",
            "parties",
            "amounts",
            "durations",
            "dates",
            "vague_terms",
            "provisions",
            "adjustments",
        ],
        _ => &[],
    }
}

pub fn is_supported_type(span_type: &str) -> bool {
    span_type == "Document" || SUPPORTED_TYPES.contains(&span_type)
}

/// A single field that did not satisfy its check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: String,
    /// Operator and expected value, e.g. `>=60`
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\u{2717} {}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Outcome of checking one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionOutcome {
    Passed,
    /// The closest candidate and the fields it got wrong
    Failed(Vec<FieldMismatch>),
    /// Nothing of the asserted kind was observed at the target
    NotFound { reason: String },
    /// The assertion names a kind or field the runner does not know
    Unsupported { reason: String },
}

impl AssertionOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionOutcome::Passed)
    }
}

/// The result of one assertion within a fixture.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    pub assertion: Assertion,
    /// Text of the target span; empty for document assertions
    pub span_text: String,
    pub outcome: AssertionOutcome,
}

/// All assertion results for one fixture.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub fixture_name: String,
    pub results: Vec<AssertionResult>,
}

impl MatchResult {
    pub fn new(fixture_name: impl Into<String>) -> Self {
        Self {
            fixture_name: fixture_name.into(),
            results: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.outcome.is_passed())
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_passed())
    }
}

/// Compare one observed value against a check.
///
/// Numbers compare numerically when both sides parse; other values compare
/// case-insensitively.
pub fn compare(operator: CompareOp, expected: &str, actual: &str) -> bool {
    let numbers = (expected.parse::<f64>(), actual.parse::<f64>());
    match operator {
        CompareOp::Equals => match numbers {
            (Ok(e), Ok(a)) => (e - a).abs() < 1e-9,
            _ => expected.eq_ignore_ascii_case(actual),
        },
        CompareOp::Gte => matches!(numbers, (Ok(e), Ok(a)) if a >= e),
        CompareOp::Lte => matches!(numbers, (Ok(e), Ok(a)) if a <= e),
        CompareOp::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
    }
}

/// Check every field of one candidate, returning the fields that fail.
pub fn check_fields(checks: &[FieldCheck], observed: &Observation) -> Vec<FieldMismatch> {
    checks
        .iter()
        .filter_map(|check| {
            let actual = observed
                .iter()
                .find(|(name, _)| *name == check.field)
                .map(|(_, value)| value.as_str());
            match actual {
                Some(actual) if compare(check.operator, &check.expected, actual) => None,
                actual => Some(FieldMismatch {
                    field: check.field.clone(),
                    expected: format!("{}{}", check.operator, check.expected),
                    actual: actual.unwrap_or("<missing>").to_string(),
                }),
            }
        })
        .collect()
}

/// Passes when any candidate satisfies every check.
pub fn check_candidates(
    span_type: &str,
    checks: &[FieldCheck],
    candidates: &[Observation],
) -> AssertionOutcome {
    if candidates.is_empty() {
        return AssertionOutcome::NotFound {
            reason: format!("no {} observed at the target", span_type),
        };
    }

    let mut closest: Option<Vec<FieldMismatch>> = None;
    for candidate in candidates {
        let mismatches = check_fields(checks, candidate);
        if mismatches.is_empty() {
            return AssertionOutcome::Passed;
        }
        if closest.as_ref().map_or(true, |c| mismatches.len() < c.len()) {
            closest = Some(mismatches);
        }
    }

    AssertionOutcome::Failed(closest.unwrap_or_default())
}

/// Passes when no candidate satisfies every check.
pub fn check_absent(checks: &[FieldCheck], candidates: &[Observation]) -> AssertionOutcome {
    match candidates
        .iter()
        .find(|candidate| check_fields(checks, candidate).is_empty())
    {
        None => AssertionOutcome::Passed,
        Some(candidate) => AssertionOutcome::Failed(
            checks
                .iter()
                .map(|check| FieldMismatch {
                    field: check.field.clone(),
                    expected: format!("no match for {}", check),
                    actual: candidate
                        .iter()
                        .find(|(name, _)| *name == check.field)
                        .map_or_else(String::new, |(_, value)| value.clone()),
                })
                .collect(),
        ),
    }
}

/// Reject field names the assertion kind does not define.
pub fn unknown_fields(span_type: &str, checks: &[FieldCheck]) -> Vec<String> {
    let valid = valid_fields_for_type(span_type);
    checks
        .iter()
        .filter(|c| !valid.contains(&c.field.as_str()))
        .map(|c| c.field.clone())
        .collect()
}
