//! Turning an assessment into guidance for a reader.
//!
//! Prose generation lives behind [`ExplanationProvider`] so the core never
//! depends on a particular text generator. [`RecommendationProvider`] is the
//! deterministic built-in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RiskAssessment, RiskCategory, RiskFinding, Severity};

#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error("assessment is inconsistent: {0}")]
    InconsistentAssessment(String),

    #[error("explanation provider failed: {0}")]
    Provider(String),
}

/// Consumes a finished assessment read-only.
pub trait ExplanationProvider {
    type Output;

    fn explain(&self, assessment: &RiskAssessment) -> Result<Self::Output, ExplanationError>;
}

/// Action items grouped by urgency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate_attention: Vec<String>,
    pub negotiate_changes: Vec<String>,
    pub seek_legal_review: Vec<String>,
    pub monitor_compliance: Vec<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.immediate_attention.is_empty()
            && self.negotiate_changes.is_empty()
            && self.seek_legal_review.is_empty()
            && self.monitor_compliance.is_empty()
    }

    /// (heading, items) for every group, in urgency order.
    pub fn groups(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Immediate attention", &self.immediate_attention),
            ("Negotiate changes", &self.negotiate_changes),
            ("Seek legal review", &self.seek_legal_review),
            ("Monitor compliance", &self.monitor_compliance),
        ]
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Maps each finding's adjusted severity to a recommendation group.
///
/// - High in Unlimited Liability or Personal Guarantee: immediate attention
///   and legal review
/// - other High, and Medium: negotiate changes
/// - Low: monitor compliance
#[derive(Debug, Default, Clone, Copy)]
pub struct RecommendationProvider;

impl RecommendationProvider {
    pub fn new() -> Self {
        Self
    }

    fn add(&self, out: &mut Recommendations, finding: &RiskFinding, severity: Severity) {
        let description = &finding.rationale.description;
        let lower = description.to_lowercase();

        match severity {
            Severity::High
                if matches!(
                    finding.category,
                    RiskCategory::UnlimitedLiability | RiskCategory::PersonalGuarantee
                ) =>
            {
                push_unique(
                    &mut out.immediate_attention,
                    format!("CRITICAL: {} - {}", description, finding.rationale.concern),
                );
                push_unique(
                    &mut out.seek_legal_review,
                    format!(
                        "Have lawyer review {} clause",
                        finding.category.to_string().to_lowercase()
                    ),
                );
            }
            Severity::High => {
                push_unique(
                    &mut out.negotiate_changes,
                    format!("Negotiate to modify or remove {lower}"),
                );
            }
            Severity::Medium => {
                push_unique(
                    &mut out.negotiate_changes,
                    format!("Consider negotiating {lower} terms"),
                );
            }
            Severity::Low => {
                push_unique(
                    &mut out.monitor_compliance,
                    format!("Monitor compliance with {lower}"),
                );
            }
        }
    }
}

impl ExplanationProvider for RecommendationProvider {
    type Output = Recommendations;

    fn explain(&self, assessment: &RiskAssessment) -> Result<Recommendations, ExplanationError> {
        if assessment.findings.len() != assessment.finding_severities.len() {
            return Err(ExplanationError::InconsistentAssessment(format!(
                "{} findings but {} severities",
                assessment.findings.len(),
                assessment.finding_severities.len()
            )));
        }

        let mut out = Recommendations::default();
        for (finding, severity) in assessment.findings.iter().zip(&assessment.finding_severities) {
            self.add(&mut out, finding, *severity);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalyzerConfig, RiskAnalyzer};

    fn recommend(text: &str) -> Recommendations {
        let assessment = RiskAnalyzer::new(&AnalyzerConfig::standard())
            .unwrap()
            .analyze_text(text)
            .unwrap();
        RecommendationProvider::new().explain(&assessment).unwrap()
    }

    #[test]
    fn unlimited_liability_needs_immediate_attention() {
        let recs = recommend("The Vendor shall have unlimited liability for all claims.");
        assert_eq!(
            recs.immediate_attention,
            vec!["CRITICAL: Unlimited liability clause - Catastrophic financial risk beyond business capacity"]
        );
        assert_eq!(recs.seek_legal_review, vec!["Have lawyer review unlimited liability clause"]);
        assert!(recs.negotiate_changes.is_empty());
    }

    #[test]
    fn groups_follow_adjusted_severity() {
        let recs = recommend(
            "The Client may terminate this agreement at any time.\n\n\
             Any dispute shall be referred to arbitration.",
        );
        assert_eq!(
            recs.negotiate_changes,
            vec![
                "Negotiate to modify or remove unilateral termination rights",
                "Consider negotiating jurisdiction or arbitration location clause terms",
            ]
        );
        assert!(recs.monitor_compliance.is_empty());
    }

    #[test]
    fn lowered_findings_are_monitored() {
        // 6 months is a short restraint
        let recs = recommend("The Employee shall not compete with the Employer for 6 months.");
        assert_eq!(recs.monitor_compliance, vec!["Monitor compliance with non-compete or restraint clause"]);
    }

    #[test]
    fn clean_contract_has_no_recommendations() {
        assert!(recommend("The parties shall meet quarterly to review progress.").is_empty());
    }

    #[test]
    fn rejects_mismatched_severities() {
        let mut assessment = RiskAnalyzer::new(&AnalyzerConfig::standard())
            .unwrap()
            .analyze_text("Any dispute shall be referred to arbitration.")
            .unwrap();
        assessment.finding_severities.clear();
        assert!(matches!(
            RecommendationProvider::new().explain(&assessment),
            Err(ExplanationError::InconsistentAssessment(_))
        ));
    }
}
