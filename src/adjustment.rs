//! Contextual severity adjustments as a data-driven rule table.
//!
//! Each [`AdjustmentRule`] pairs a [`Condition`] with an [`Effect`]. Rules are
//! evaluated in table order against every finding of their category.

use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CatalogError, CompiledCatalog, ContractProfile, RiskCategory, RiskFinding, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Another category has a finding anywhere in the contract
    CoOccurs(RiskCategory),
    /// The first amount in the finding's clause is below the value
    AmountBelow(Decimal),
    /// The first amount in the finding's clause is above the value
    AmountAbove(Decimal),
    /// The first duration in the finding's clause is at most this many days
    DurationAtMost { days: f64 },
    /// The first duration in the finding's clause is at least this many days
    DurationAtLeast { days: f64 },
    /// The finding's clause matches a case-insensitive pattern
    ClauseMentions(String),
    /// The finding's clause contains a catalog mitigation
    Mitigated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Raise to at least this severity; never lowers
    EscalateTo(Severity),
    Raise,
    Lower,
}

impl Effect {
    pub fn apply(self, severity: Severity) -> Severity {
        match self {
            Effect::EscalateTo(target) => severity.max(target),
            Effect::Raise => severity.raise(),
            Effect::Lower => severity.lower(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRule {
    pub name: String,
    /// `None` applies to findings of every category
    pub category: Option<RiskCategory>,
    pub condition: Condition,
    pub effect: Effect,
}

impl AdjustmentRule {
    fn new(name: &str, category: Option<RiskCategory>, condition: Condition, effect: Effect) -> Self {
        Self {
            name: name.to_string(),
            category,
            condition,
            effect,
        }
    }

    /// The built-in table. Escalations come last so later rules cannot undo them.
    pub fn standard_table() -> Vec<AdjustmentRule> {
        use Condition::*;
        use Effect::*;
        use RiskCategory::*;

        vec![
            Self::new(
                "small-penalty",
                Some(Penalty),
                AmountBelow(Decimal::from(10_000)),
                Lower,
            ),
            Self::new(
                "large-penalty",
                Some(Penalty),
                AmountAbove(Decimal::from(1_000_000)),
                Raise,
            ),
            Self::new(
                "short-non-compete",
                Some(NonCompete),
                DurationAtMost { days: 365.0 },
                Lower,
            ),
            // three years, or 36 months of 30 days
            Self::new(
                "long-non-compete",
                Some(NonCompete),
                DurationAtLeast { days: 1080.0 },
                Raise,
            ),
            Self::new(
                "termination-without-notice",
                Some(UnilateralTermination),
                ClauseMentions(r"\bwithout\s+(?:any\s+)?(?:prior\s+)?notice\b".to_string()),
                Raise,
            ),
            Self::new(
                "termination-with-notice",
                Some(UnilateralTermination),
                ClauseMentions(
                    r"\b\d+\)?\s+(?:calendar\s+|business\s+|working\s+)?days['’]?\s+(?:prior\s+)?(?:written\s+)?notice\b"
                        .to_string(),
                ),
                Lower,
            ),
            Self::new("mitigations", None, Mitigated, Lower),
            Self::new(
                "guarantee-with-unlimited-liability",
                Some(PersonalGuarantee),
                CoOccurs(UnlimitedLiability),
                EscalateTo(Severity::High),
            ),
            Self::new(
                "guarantee-with-unlimited-liability",
                Some(UnlimitedLiability),
                CoOccurs(PersonalGuarantee),
                EscalateTo(Severity::High),
            ),
        ]
    }
}

/// A rule that fired for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub rule: String,
    pub clause_index: usize,
    pub category: RiskCategory,
    pub from: Severity,
    pub to: Severity,
}

enum CompiledCondition {
    CoOccurs(RiskCategory),
    AmountBelow(Decimal),
    AmountAbove(Decimal),
    DurationAtMost(f64),
    DurationAtLeast(f64),
    ClauseMentions(Regex),
    Mitigated,
}

pub(crate) struct CompiledRule {
    name: String,
    category: Option<RiskCategory>,
    condition: CompiledCondition,
    effect: Effect,
}

/// What a condition may look at.
pub(crate) struct RuleContext<'a> {
    pub profile: &'a ContractProfile,
    pub findings: &'a [RiskFinding],
    pub clause_text: &'a str,
    pub catalog: &'a CompiledCatalog,
}

impl CompiledRule {
    pub(crate) fn compile(rule: &AdjustmentRule) -> Result<Self, CatalogError> {
        let invalid = |message: String| CatalogError::InvalidAdjustment {
            name: rule.name.clone(),
            message,
        };
        let condition = match &rule.condition {
            Condition::CoOccurs(category) => CompiledCondition::CoOccurs(*category),
            Condition::AmountBelow(value) => CompiledCondition::AmountBelow(*value),
            Condition::AmountAbove(value) => CompiledCondition::AmountAbove(*value),
            Condition::DurationAtMost { days } | Condition::DurationAtLeast { days }
                if !days.is_finite() || *days < 0.0 =>
            {
                return Err(invalid(format!("duration must be non-negative, got {days}")));
            }
            Condition::DurationAtMost { days } => CompiledCondition::DurationAtMost(*days),
            Condition::DurationAtLeast { days } => CompiledCondition::DurationAtLeast(*days),
            Condition::ClauseMentions(pattern) => CompiledCondition::ClauseMentions(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            Condition::Mitigated => CompiledCondition::Mitigated,
        };

        Ok(Self {
            name: rule.name.clone(),
            category: rule.category,
            condition,
            effect: rule.effect,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn effect(&self) -> Effect {
        self.effect
    }

    pub(crate) fn applies(&self, finding: &RiskFinding, ctx: &RuleContext<'_>) -> bool {
        if self.category.map_or(false, |c| c != finding.category) {
            return false;
        }

        let clause = finding.clause_index;
        let first_amount = || ctx.profile.amounts_in(clause).next().map(|a| a.value);
        let first_days = || ctx.profile.durations_in(clause).next().map(|d| d.to_approx_days());

        match &self.condition {
            CompiledCondition::CoOccurs(other) => ctx.findings.iter().any(|f| f.category == *other),
            CompiledCondition::AmountBelow(limit) => first_amount().map_or(false, |v| v < *limit),
            CompiledCondition::AmountAbove(limit) => first_amount().map_or(false, |v| v > *limit),
            CompiledCondition::DurationAtMost(days) => first_days().map_or(false, |d| d <= *days),
            CompiledCondition::DurationAtLeast(days) => first_days().map_or(false, |d| d >= *days),
            CompiledCondition::ClauseMentions(regex) => regex.is_match(ctx.clause_text),
            CompiledCondition::Mitigated => !ctx.catalog.mitigations_in(ctx.clause_text).is_empty(),
        }
    }
}
