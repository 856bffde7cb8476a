use crate::{AnalysisError, RiskAssessment};

fn violation(message: String) -> AnalysisError {
    tracing::error!(%message, "assessment failed invariant check");
    AnalysisError::InternalInvariantViolation { message }
}

/// Check the cross-references of a freshly assembled assessment.
///
/// Messages name indices and counts only.
pub(super) fn verify(assessment: &RiskAssessment, segment_count: usize) -> Result<(), AnalysisError> {
    let clause_count = assessment.clauses.len();
    if clause_count != segment_count {
        return Err(violation(format!(
            "segmenter produced {segment_count} clauses but assessment holds {clause_count}"
        )));
    }

    for (position, clause) in assessment.clauses.iter().enumerate() {
        if clause.index() != position {
            return Err(violation(format!(
                "clause at position {position} has index {}",
                clause.index()
            )));
        }
    }

    if assessment.finding_severities.len() != assessment.findings.len() {
        return Err(violation(format!(
            "{} findings but {} severities",
            assessment.findings.len(),
            assessment.finding_severities.len()
        )));
    }

    for finding in &assessment.findings {
        let Some(clause) = assessment.clauses.get(finding.clause_index) else {
            return Err(violation(format!(
                "{} finding references missing clause {}",
                finding.category, finding.clause_index
            )));
        };
        let span = &finding.matched_span;
        if span.start > span.end || clause.text().get(span.clone()).is_none() {
            return Err(violation(format!(
                "{} finding span {span:?} is outside clause {}",
                finding.category, finding.clause_index
            )));
        }
    }

    let keys_match = assessment.clause_severities.len() == clause_count
        && assessment.clause_severities.keys().copied().eq(0..clause_count);
    if !keys_match {
        return Err(violation(format!(
            "clause severities cover {} entries for {clause_count} clauses",
            assessment.clause_severities.len()
        )));
    }

    let profile = &assessment.contract_profile;
    let entity_indices = profile
        .monetary_amounts
        .iter()
        .map(|a| a.clause_index)
        .chain(profile.durations.iter().map(|d| d.clause_index))
        .chain(profile.dates.iter().map(|d| d.clause_index))
        .chain(profile.vague_terms.iter().map(|v| v.clause_index))
        .chain(profile.provisions.iter().map(|p| p.clause_index));
    for index in entity_indices {
        if index >= clause_count {
            return Err(violation(format!("entity references missing clause {index}")));
        }
    }

    if assessment.overall_score > 100 {
        return Err(violation(format!(
            "overall score {} exceeds 100",
            assessment.overall_score
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalyzerConfig, RiskAnalyzer};

    fn assessment() -> RiskAssessment {
        RiskAnalyzer::new(&AnalyzerConfig::standard())
            .unwrap()
            .analyze_text("Employer may terminate this agreement at any time without notice.")
            .unwrap()
    }

    #[test]
    fn accepts_assembled_assessment() {
        let assessment = assessment();
        assert!(verify(&assessment, assessment.clauses.len()).is_ok());
    }

    #[test]
    fn dangling_finding_is_a_violation() {
        let mut assessment = assessment();
        assessment.findings[0].clause_index = 7;
        let err = verify(&assessment, 1).unwrap_err();
        assert!(matches!(err, AnalysisError::InternalInvariantViolation { .. }));
        assert!(err.to_string().contains("missing clause 7"));
    }

    #[test]
    fn span_outside_clause_is_a_violation() {
        let mut assessment = assessment();
        assessment.findings[0].matched_span = 0..10_000;
        assert!(verify(&assessment, 1).is_err());
    }

    #[test]
    fn clause_count_mismatch_is_a_violation() {
        let assessment = assessment();
        assert!(verify(&assessment, 3).is_err());
    }
}
