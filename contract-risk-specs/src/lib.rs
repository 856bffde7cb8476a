//! Fixture-driven acceptance tests for contract risk assessments.
//!
//! Test cases are `.contract` files: contract text with inline «ID:text»
//! span markers, followed by `>` assertion lines about what the analyzer
//! should report for those spans.
//!
//! ## Modules
//!
//! - [`parser`] - Parses `.contract` fixture files with inline annotations
//! - [`fixture`] - Parsed fixture types
//! - [`loader`] - Loads fixtures from disk
//! - [`matcher`] - Field checks against observed assessment values
//! - [`runner`] - Runs fixtures through a [`RiskAnalyzer`](contract_risk::RiskAnalyzer)
//! - [`errors`] - Error types for the harness
//! - [`formatter`] - Failure reports with field-level diagnostics
//! - [`failures`] - Expected failures tracking via TOML

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod matcher;
pub mod parser;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{
    Assertion, AssertionBody, CompareOp, ContractFixture, EntityDef, FieldCheck, MarkerId,
    Paragraph, RefTarget, SpanMarker,
};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use matcher::{
    is_supported_type, valid_fields_for_type, AssertionOutcome, AssertionResult, FieldMismatch,
    MatchResult,
};
pub use parser::{parse_fixture, parse_spans};
pub use runner::{check_fixture_assertions, run_fixture};
