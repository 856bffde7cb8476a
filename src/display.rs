use std::fmt::{self, Write};
use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::{Clause, ContractProfile, RiskAssessment, RiskFinding, Severity};

/// One underlined span.
struct Mark {
    span: Range<usize>,
    label: String,
}

/// Renders a clause with labeled underlines beneath matched spans.
///
/// ```text
/// Employee shall pay a penalty of ₹100,000 for breach.
///                      ╰─────╯Penalty/Liquidated Damages (High)
///                                 ╰──────╯Amount(INR 100000)
/// ```
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    marks: Vec<Mark>,
}

impl<'a> ClauseDisplay<'a> {
    pub fn new(clause: &'a Clause) -> Self {
        ClauseDisplay {
            clause,
            marks: Vec::new(),
        }
    }

    /// Underline `finding`, labeled by category and, when given, severity.
    /// Findings for other clauses are ignored.
    pub fn include_finding(&mut self, finding: &RiskFinding, severity: Option<Severity>) {
        if finding.clause_index != self.clause.index() {
            return;
        }
        let label = match severity {
            Some(severity) => format!("{} ({})", finding.category, severity),
            None => finding.category.to_string(),
        };
        self.marks.push(Mark {
            span: finding.matched_span.clone(),
            label,
        });
    }

    pub fn with_findings<'f>(mut self, findings: impl IntoIterator<Item = &'f RiskFinding>) -> Self {
        for finding in findings {
            self.include_finding(finding, None);
        }
        self
    }

    /// Findings of this clause with their adjusted severities.
    pub fn with_assessment(mut self, assessment: &RiskAssessment) -> Self {
        for (finding, severity) in assessment.findings_for(self.clause.index()) {
            self.include_finding(finding, Some(severity));
        }
        self
    }

    pub fn with_amounts(mut self, profile: &ContractProfile) -> Self {
        for amount in profile.amounts_in(self.clause.index()) {
            self.marks.push(Mark {
                span: amount.span.clone(),
                label: format!("Amount({} {})", amount.currency, amount.value),
            });
        }
        self
    }

    pub fn with_durations(mut self, profile: &ContractProfile) -> Self {
        for duration in profile.durations_in(self.clause.index()) {
            self.marks.push(Mark {
                span: duration.span.clone(),
                label: format!("Duration({} {:?})", duration.value, duration.unit),
            });
        }
        self
    }
}

// Employee shall not compete for 2 years.
//                ╰─────────╯Non-Compete
//                                ╰─────╯Duration(2 Years)
impl<'a> fmt::Display for ClauseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // single-byte whitespace becomes a space so byte offsets survive
        let line: String = self
            .clause
            .text()
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();

        f.write_str(&line)?;

        for mark in &self.marks {
            let (Some(before), Some(through)) = (line.get(..mark.span.start), line.get(..mark.span.end))
            else {
                continue;
            };

            f.write_char('\n')?;

            let start_char_idx = UnicodeWidthStr::width(before);
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let end_char_idx = UnicodeWidthStr::width(through);
            let char_len = end_char_idx.saturating_sub(start_char_idx);
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&mark.label)?;
        }

        Ok(())
    }
}
