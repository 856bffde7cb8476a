//! Risk scoring.
//!
//! 1. Each finding starts at its base severity and passes through the
//!    adjustment table.
//! 2. Each finding contributes points by adjusted severity, discounted when
//!    the contract type is `Unknown`.
//! 3. The raw total is diluted by clauses without findings and mapped onto
//!    0-100 by a saturating curve:
//!
//! ```text
//! density = raw / (1 + clean_clauses / dilution)
//! score   = round(100 * (1 - e^(-density / saturation)))
//! ```
//!
//! Only clean clauses dilute, so adding a clause that carries a finding never
//! lowers the score.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::adjustment::{CompiledRule, RuleContext};
use crate::{
    AdjustmentRule, AppliedAdjustment, CatalogError, Clause, CompiledCatalog, ContractProfile,
    ContractType, RiskCategory, RiskFinding, Severity,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub high_points: f64,
    pub medium_points: f64,
    pub low_points: f64,
    /// Clean clauses that halve the density
    pub dilution: f64,
    /// Density at which the score reaches ~63
    pub saturation: f64,
    /// Multiplier on every finding's points when the contract type is `Unknown`
    pub unknown_discount: f64,
    pub adjustments: Vec<AdjustmentRule>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self {
            high_points: 10.0,
            medium_points: 5.0,
            low_points: 2.0,
            dilution: 10.0,
            saturation: 25.0,
            unknown_discount: 0.6,
            adjustments: AdjustmentRule::standard_table(),
        }
    }
}

/// Overall score band: Low 0-30, Medium 31-70, High 71-100.
pub fn score_band(score: u8) -> Severity {
    match score {
        0..=30 => Severity::Low,
        31..=70 => Severity::Medium,
        _ => Severity::High,
    }
}

/// Output of [`RiskScorer::score`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    /// Adjusted severity of each finding, parallel to the findings
    pub finding_severities: Vec<Severity>,
    /// Every clause index; `None` when the clause has no findings
    pub clause_severities: BTreeMap<usize, Option<Severity>>,
    pub overall_score: u8,
    /// Points per category before normalization
    pub score_breakdown: BTreeMap<RiskCategory, f64>,
    pub adjustments: Vec<AppliedAdjustment>,
}

pub struct RiskScorer {
    high_points: f64,
    medium_points: f64,
    low_points: f64,
    dilution: f64,
    saturation: f64,
    unknown_discount: f64,
    rules: Vec<CompiledRule>,
}

impl RiskScorer {
    pub fn compile(config: &ScoringConfig) -> Result<Self, CatalogError> {
        let positive = [
            ("high_points", config.high_points),
            ("medium_points", config.medium_points),
            ("low_points", config.low_points),
            ("dilution", config.dilution),
            ("saturation", config.saturation),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CatalogError::InvalidScoringParameter { name, value });
            }
        }
        let discount = config.unknown_discount;
        if !(discount > 0.0 && discount <= 1.0) {
            return Err(CatalogError::InvalidDiscount(discount));
        }

        let rules = config
            .adjustments
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            high_points: config.high_points,
            medium_points: config.medium_points,
            low_points: config.low_points,
            dilution: config.dilution,
            saturation: config.saturation,
            unknown_discount: discount,
            rules,
        })
    }

    fn points(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high_points,
            Severity::Medium => self.medium_points,
            Severity::Low => self.low_points,
        }
    }

    pub fn score(
        &self,
        clauses: &[Clause],
        findings: &[RiskFinding],
        profile: &ContractProfile,
        catalog: &CompiledCatalog,
    ) -> ScoreCard {
        let mut adjustments = Vec::new();
        let finding_severities: Vec<Severity> = findings
            .iter()
            .map(|finding| {
                let clause_text = clauses
                    .get(finding.clause_index)
                    .map_or("", |c| c.text());
                let ctx = RuleContext {
                    profile,
                    findings,
                    clause_text,
                    catalog,
                };
                let mut severity = finding.base_severity;
                for rule in &self.rules {
                    if rule.applies(finding, &ctx) {
                        let to = rule.effect().apply(severity);
                        adjustments.push(AppliedAdjustment {
                            rule: rule.name().to_string(),
                            clause_index: finding.clause_index,
                            category: finding.category,
                            from: severity,
                            to,
                        });
                        severity = to;
                    }
                }
                severity
            })
            .collect();

        let mut clause_severities: BTreeMap<usize, Option<Severity>> =
            clauses.iter().map(|c| (c.index(), None)).collect();
        for (finding, severity) in findings.iter().zip(&finding_severities) {
            let slot = clause_severities.entry(finding.clause_index).or_insert(None);
            *slot = Some(slot.map_or(*severity, |s| s.max(*severity)));
        }

        let weight = if profile.contract_type.value == ContractType::Unknown {
            self.unknown_discount
        } else {
            1.0
        };

        let mut score_breakdown: BTreeMap<RiskCategory, f64> = BTreeMap::new();
        let mut counted = HashSet::new();
        for (finding, severity) in findings.iter().zip(&finding_severities) {
            // one contribution per category per clause
            if !counted.insert((finding.clause_index, finding.category)) {
                continue;
            }
            *score_breakdown.entry(finding.category).or_insert(0.0) += self.points(*severity) * weight;
        }

        let raw: f64 = score_breakdown.values().sum();
        let clean = clause_severities.values().filter(|s| s.is_none()).count();
        let overall_score = self.normalize(raw, clean);

        tracing::debug!(
            raw_points = raw,
            clean_clauses = clean,
            overall_score,
            adjustments = adjustments.len(),
            "scored findings"
        );

        ScoreCard {
            finding_severities,
            clause_severities,
            overall_score,
            score_breakdown,
            adjustments,
        }
    }

    fn normalize(&self, raw: f64, clean_clauses: usize) -> u8 {
        let density = raw / (1.0 + clean_clauses as f64 / self.dilution);
        let score = 100.0 * (1.0 - (-density / self.saturation).exp());
        score.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RiskScorer {
        RiskScorer::compile(&ScoringConfig::standard()).unwrap()
    }

    #[test]
    fn normalization_curve() {
        let scorer = scorer();
        assert_eq!(scorer.normalize(0.0, 0), 0);
        assert_eq!(scorer.normalize(0.0, 50), 0);
        // e^-1
        assert_eq!(scorer.normalize(25.0, 0), 63);
        assert_eq!(scorer.normalize(10.0, 0), 33);
        // ten clean clauses halve the density
        assert_eq!(scorer.normalize(20.0, 10), 33);
        assert_eq!(scorer.normalize(10_000.0, 0), 100);
    }

    #[test]
    fn bands() {
        assert_eq!(score_band(0), Severity::Low);
        assert_eq!(score_band(30), Severity::Low);
        assert_eq!(score_band(31), Severity::Medium);
        assert_eq!(score_band(70), Severity::Medium);
        assert_eq!(score_band(71), Severity::High);
        assert_eq!(score_band(100), Severity::High);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut config = ScoringConfig::standard();
        config.saturation = 0.0;
        assert!(matches!(
            RiskScorer::compile(&config),
            Err(CatalogError::InvalidScoringParameter { name: "saturation", .. })
        ));

        let mut config = ScoringConfig::standard();
        config.unknown_discount = 1.5;
        assert!(matches!(
            RiskScorer::compile(&config),
            Err(CatalogError::InvalidDiscount(_))
        ));

        let mut config = ScoringConfig::standard();
        config.dilution = f64::NAN;
        assert!(RiskScorer::compile(&config).is_err());
    }
}
