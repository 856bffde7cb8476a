//! Rendering of assessments for the terminal.

use std::fmt::Write;

use contract_risk::{ClauseDisplay, Recommendations, RiskAssessment};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    assessment: &'a RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<&'a Recommendations>,
}

/// The assessment (and recommendations, if any) as pretty-printed JSON.
pub fn render_json(
    assessment: &RiskAssessment,
    recommendations: Option<&Recommendations>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        assessment,
        recommendations,
    })
}

/// A summary followed by every clause with findings, underlined.
pub fn render_text(assessment: &RiskAssessment, recommendations: Option<&Recommendations>) -> String {
    let profile = &assessment.contract_profile;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Contract type: {} (confidence {:.2})",
        profile.contract_type.value, profile.contract_type.confidence
    );
    let _ = writeln!(
        out,
        "Overall risk:  {}/100 ({})",
        assessment.overall_score, assessment.overall_level
    );
    let _ = writeln!(
        out,
        "Clauses:       {} ({} with findings)",
        assessment.clauses.len(),
        assessment.clause_severities.values().filter(|s| s.is_some()).count()
    );
    if !profile.parties.is_empty() {
        let names: Vec<&str> = profile.parties.iter().map(|p| p.name.as_str()).collect();
        let _ = writeln!(out, "Parties:       {}", names.join(", "));
    }

    for clause in &assessment.clauses {
        let Some(severity) = assessment.clause_severity(clause.index()) else {
            continue;
        };
        let role = clause.role().map(|r| r.to_string()).unwrap_or_default();
        let topic = clause.topic().map(|t| t.to_string()).unwrap_or_default();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Clause {} [{}, {}] {}",
            clause.index() + 1,
            role,
            topic,
            severity
        );
        let display = ClauseDisplay::new(clause)
            .with_assessment(assessment)
            .with_amounts(profile)
            .with_durations(profile);
        let _ = writeln!(out, "{display}");
    }

    if !assessment.adjustments.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Adjustments:");
        for adjustment in &assessment.adjustments {
            let _ = writeln!(
                out,
                "  clause {}: {} {} -> {} ({})",
                adjustment.clause_index + 1,
                adjustment.category,
                adjustment.from,
                adjustment.to,
                adjustment.rule
            );
        }
    }

    if let Some(recommendations) = recommendations.filter(|r| !r.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendations:");
        for (heading, items) in recommendations.groups() {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {heading}:");
            for item in items {
                let _ = writeln!(out, "    - {item}");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_risk::{AnalyzerConfig, ExplanationProvider, RecommendationProvider, RiskAnalyzer};

    fn assess(text: &str) -> RiskAssessment {
        RiskAnalyzer::new(&AnalyzerConfig::standard())
            .unwrap()
            .analyze_text(text)
            .unwrap()
    }

    #[test]
    fn text_report_lists_only_risky_clauses() {
        let assessment = assess(
            "The Tenant shall pay rent monthly.\n\nThe Tenant shall pay a penalty of ₹100,000 for breach.",
        );
        let text = render_text(&assessment, None);
        assert!(text.contains("Overall risk:"));
        assert!(text.contains("Clause 2 [obligation, payment] High"));
        assert!(text.contains("Penalty/Liquidated Damages (High)"));
        assert!(!text.contains("Clause 1 "));
        assert!(!text.contains("Recommendations:"));
    }

    #[test]
    fn text_report_includes_recommendations() {
        let assessment = assess("The Buyer shall have unlimited liability for all claims.");
        let recommendations = RecommendationProvider::new().explain(&assessment).unwrap();
        let text = render_text(&assessment, Some(&recommendations));
        assert!(text.contains("Recommendations:"));
        assert!(text.contains("  Immediate attention:\n    - CRITICAL:"));
    }

    #[test]
    fn json_report_flattens_the_assessment() {
        let assessment = assess("The Employee shall pay a penalty of ₹100,000 for breach.");
        let json = render_json(&assessment, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        // one finding, no clean clauses: 100 * (1 - e^-0.4)
        assert_eq!(value["overall_score"], 33);
        assert_eq!(value["overall_level"], "Medium");
        assert_eq!(value["findings"][0]["category"], "penalty");
        assert!(value.get("recommendations").is_none());
    }
}
