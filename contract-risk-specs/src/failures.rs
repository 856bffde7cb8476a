//! Expected failures tracking via TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::fixture::Assertion;
use crate::SpecError;

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known failures (won't fix soon).
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Pending failures (awaiting fix).
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected failure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture file name.
    pub fixture: String,
    /// Assertion reference, e.g. `[2] Finding` (see [`ExpectedFailures::format_ref`]).
    pub assertion: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    /// Known limitation, won't fix soon.
    Known,
    /// Awaiting fix, not blocking.
    Pending,
    /// Expected to pass - failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means no expected failures.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let load_error = |message: String| SpecError::Load {
            path: path.display().to_string(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_error(e.to_string()))
    }

    pub fn is_expected(&self, fixture: &str, assertion_ref: &str) -> FailureState {
        if find_entry(&self.known, fixture, assertion_ref).is_some() {
            FailureState::Known
        } else if find_entry(&self.pending, fixture, assertion_ref).is_some() {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    /// Reference an assertion by its target and kind.
    pub fn format_ref(assertion: &Assertion) -> String {
        format!("{} {}", assertion.target, assertion.span_type)
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, assertion_ref: &str) -> Option<&FailureEntry> {
        find_entry(&self.known, fixture, assertion_ref)
            .or_else(|| find_entry(&self.pending, fixture, assertion_ref))
    }
}

fn find_entry<'a>(
    entries: &'a [FailureEntry],
    fixture: &str,
    assertion_ref: &str,
) -> Option<&'a FailureEntry> {
    entries
        .iter()
        .find(|e| e.fixture == fixture && e.assertion == assertion_ref)
}

/// Result of running the harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    pub total: usize,
    pub passed: usize,
    /// Expected failures (known + pending).
    pub expected_failures: usize,
    /// Regressions (unexpected failures).
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the exit code (0 = pass, 1 = regressions).
    pub fn exit_code(&self) -> i32 {
        if self.regressions > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{AssertionBody, RefTarget};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(fixture: &str, assertion: &str) -> FailureEntry {
        FailureEntry {
            fixture: fixture.to_string(),
            assertion: assertion.to_string(),
            reason: None,
            added: None,
            issue: None,
        }
    }

    #[test]
    fn test_is_expected() {
        let failures = ExpectedFailures {
            known: vec![entry("lease.contract", "[1] Finding")],
            pending: vec![entry("lease.contract", "[2] Amount")],
        };

        assert_eq!(failures.is_expected("lease.contract", "[1] Finding"), FailureState::Known);
        assert_eq!(failures.is_expected("lease.contract", "[2] Amount"), FailureState::Pending);
        assert_eq!(
            failures.is_expected("lease.contract", "[3] Finding"),
            FailureState::Regression
        );
        assert_eq!(failures.count(), 2);
        assert!(failures.get_entry("lease.contract", "[2] Amount").is_some());
    }

    #[test]
    fn test_format_ref() {
        let assertion = Assertion {
            target: RefTarget::Span(2),
            span_type: "Finding".to_string(),
            body: AssertionBody::default(),
            source_line: 9,
        };
        assert_eq!(ExpectedFailures::format_ref(&assertion), "[2] Finding");
    }

    #[test]
    fn test_harness_result_record() {
        let mut result = HarnessResult::new();
        assert_eq!(result.exit_code(), 0);

        result.record_pass();
        result.record_failure(FailureState::Known);
        assert_eq!(result.total, 2);
        assert_eq!(result.expected_failures, 1);
        assert!(result.success());

        result.record_failure(FailureState::Regression);
        assert_eq!(result.regressions, 1);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[pending]]
fixture = "vendor.contract"
assertion = "[1] Finding"
reason = "Liability caps are not yet a mitigation"
added = "2026-10-01"

[[known]]
fixture = "nda.contract"
assertion = "[*] Document"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.pending.len(), 1);
        assert_eq!(failures.known.len(), 1);
        assert_eq!(
            failures.is_expected("vendor.contract", "[1] Finding"),
            FailureState::Pending
        );
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let failures = ExpectedFailures::load(Path::new("/nonexistent/path.toml")).unwrap();
        assert_eq!(failures.count(), 0);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[known]]\nfixture = ").unwrap();
        assert!(matches!(
            ExpectedFailures::load(file.path()),
            Err(SpecError::Load { .. })
        ));
    }
}
