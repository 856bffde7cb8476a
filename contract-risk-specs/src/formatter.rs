//! Rich error formatting for assertion failures.

use std::fmt::Write;

use crate::fixture::Assertion;
use crate::matcher::{AssertionOutcome, AssertionResult};

/// Format a failed assertion with its source line, the clause text with the
/// target underlined, and field-level details.
pub fn format_failure(
    fixture_name: &str,
    result: &AssertionResult,
    text_context: Option<&str>,
) -> String {
    let assertion = &result.assertion;
    let span_text = result.span_text.as_str();
    let mut output = String::new();

    let _ = writeln!(output, "\nFAIL: {}:{}", fixture_name, assertion.source_line);
    let _ = writeln!(output);

    if let Some(context) = text_context {
        let _ = writeln!(output, "  {}", context);
        if let Some(pos) = (!span_text.is_empty())
            .then(|| context.find(span_text))
            .flatten()
        {
            let indent = context[..pos].chars().count() + 2;
            let _ = writeln!(
                output,
                "{}{}",
                " ".repeat(indent),
                "^".repeat(span_text.chars().count())
            );
        }
        let _ = writeln!(output);
    }

    match &result.outcome {
        AssertionOutcome::Failed(fields) => {
            let _ = writeln!(
                output,
                "  assertion failed for {} at {}: \"{}\"",
                assertion.span_type, assertion.target, span_text
            );
            for field in fields {
                let _ = writeln!(
                    output,
                    "    \u{2717} {}: expected `{}`, found `{}`",
                    field.field, field.expected, field.actual
                );
            }
        }
        AssertionOutcome::NotFound { reason } => {
            let _ = writeln!(output, "  not found: {}", reason);
        }
        AssertionOutcome::Unsupported { reason } => {
            let _ = writeln!(output, "  unsupported assertion: {}", reason);
        }
        AssertionOutcome::Passed => {
            let _ = writeln!(output, "  (passed)");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "  Assertion was: {}: {}({})",
        assertion.target,
        assertion.span_type,
        format_assertion_body(assertion)
    );

    if let Some(hint) = generate_hint(assertion, &result.outcome) {
        let _ = writeln!(output);
        let _ = writeln!(output, "  hint: {}", hint);
    }

    output
}

/// Format a one-fixture summary.
pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let status = if regressions > 0 { "FAIL" } else { "PASS" };
    format!(
        "\n{}: {}\n  {} passed, {} failed ({} expected, {} regressions)\n",
        status, fixture_name, passed, failed, expected_failures, regressions
    )
}

fn format_assertion_body(assertion: &Assertion) -> String {
    assertion
        .body
        .field_checks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn generate_hint(assertion: &Assertion, outcome: &AssertionOutcome) -> Option<String> {
    match outcome {
        AssertionOutcome::Failed(fields) => {
            if assertion.span_type == "NoFinding" {
                return Some(
                    "a negation cue only suppresses a trigger within its window and before any , ; or . boundary"
                        .to_string(),
                );
            }
            if fields.iter().any(|f| f.field == "severity") {
                return Some(
                    "severity is the adjusted level - check `adjusted_by` or assert `base_severity`"
                        .to_string(),
                );
            }
            None
        }
        AssertionOutcome::NotFound { .. } if assertion.span_type == "Finding" => Some(
            "no trigger fired here - the match may be negated or its precondition unmet"
                .to_string(),
        ),
        _ => None,
    }
}
