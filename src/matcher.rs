//! Risk pattern matching.
//!
//! Every clause is scanned independently against every catalog category.
//! Within a category the first trigger (strongest first) with an unnegated
//! match wins, so a clause yields at most one finding per category. Findings
//! come out ordered by clause index, then catalog order.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{Clause, CompiledCatalog, CompiledCategory, ContractProfile, Precondition, Rationale, RiskCategory, Severity};

/// One detected instance of a risk category within a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Back-reference to [`Clause::index`]
    pub clause_index: usize,
    pub category: RiskCategory,
    pub base_severity: Severity,
    /// Byte range within the clause text
    pub matched_span: Range<usize>,
    pub matched_text: String,
    /// Source pattern of the trigger that fired
    pub trigger: String,
    pub rationale: Rationale,
}

pub struct RiskPatternMatcher<'c> {
    catalog: &'c CompiledCatalog,
}

impl<'c> RiskPatternMatcher<'c> {
    pub fn new(catalog: &'c CompiledCatalog) -> Self {
        Self { catalog }
    }

    pub fn find(&self, clauses: &[Clause], profile: &ContractProfile) -> Vec<RiskFinding> {
        let mut findings = Vec::new();

        for clause in clauses {
            for category in self.catalog.categories() {
                if !precondition_holds(category.precondition, clause.index(), profile) {
                    continue;
                }
                if let Some(finding) = self.match_category(clause, category) {
                    findings.push(finding);
                }
            }
        }

        tracing::debug!(findings = findings.len(), "matched risk patterns");
        findings
    }

    fn match_category(&self, clause: &Clause, category: &CompiledCategory) -> Option<RiskFinding> {
        let text = clause.text();

        for (pattern, regex) in &category.triggers {
            let unnegated = regex
                .find_iter(text)
                .find(|m| !self.catalog.is_negated(text, m.start()));

            if let Some(m) = unnegated {
                return Some(RiskFinding {
                    clause_index: clause.index(),
                    category: category.category,
                    base_severity: category.base_severity,
                    matched_span: m.range(),
                    matched_text: m.as_str().to_string(),
                    trigger: pattern.clone(),
                    rationale: category.rationale.clone(),
                });
            }
        }

        None
    }
}

fn precondition_holds(precondition: Precondition, clause_index: usize, profile: &ContractProfile) -> bool {
    match precondition {
        Precondition::None => true,
        Precondition::MonetaryAmount => profile.amounts_in(clause_index).next().is_some(),
        Precondition::Duration => profile.durations_in(clause_index).next().is_some(),
    }
}
