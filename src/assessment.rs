use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AppliedAdjustment, Clause, ContractProfile, RiskCategory, RiskFinding, Severity};

/// The terminal result of analyzing one document.
///
/// Built once by [`RiskAnalyzer::analyze`](crate::RiskAnalyzer::analyze) and
/// treated as a value from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub contract_profile: ContractProfile,
    pub clauses: Vec<Clause>,
    /// Ordered by clause index, then catalog category order
    pub findings: Vec<RiskFinding>,
    /// Adjusted severity of each finding, parallel to `findings`
    pub finding_severities: Vec<Severity>,
    /// Adjusted severity per clause; `None` for clauses without findings
    pub clause_severities: BTreeMap<usize, Option<Severity>>,
    /// 0-100
    pub overall_score: u8,
    pub overall_level: Severity,
    /// Raw points per category, before normalization
    pub score_breakdown: BTreeMap<RiskCategory, f64>,
    pub adjustments: Vec<AppliedAdjustment>,
}

impl RiskAssessment {
    pub fn clause(&self, index: usize) -> Option<&Clause> {
        self.clauses.get(index)
    }

    pub fn clause_severity(&self, index: usize) -> Option<Severity> {
        self.clause_severities.get(&index).copied().flatten()
    }

    /// Findings in one clause together with their adjusted severities.
    pub fn findings_for(&self, clause_index: usize) -> impl Iterator<Item = (&RiskFinding, Severity)> {
        self.findings
            .iter()
            .zip(self.finding_severities.iter().copied())
            .filter(move |(f, _)| f.clause_index == clause_index)
    }

    /// Number of findings per category.
    pub fn category_counts(&self) -> BTreeMap<RiskCategory, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.category).or_insert(0) += 1;
        }
        counts
    }
}
