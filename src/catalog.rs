//! The risk category catalog.
//!
//! A [`RiskCatalog`] is plain data (serializable, loadable from RON). It is
//! validated and compiled once into a [`CompiledCatalog`], which is read-only
//! and shared by every analysis.

use std::collections::HashSet;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::utils::word_indices;
use crate::CatalogError;

/// The fixed set of risk categories, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Penalty,
    Indemnification,
    UnilateralTermination,
    ArbitrationJurisdiction,
    AutoRenewal,
    NonCompete,
    IpAssignment,
    UnlimitedLiability,
    ExclusiveDealing,
    PersonalGuarantee,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 10] = [
        RiskCategory::Penalty,
        RiskCategory::Indemnification,
        RiskCategory::UnilateralTermination,
        RiskCategory::ArbitrationJurisdiction,
        RiskCategory::AutoRenewal,
        RiskCategory::NonCompete,
        RiskCategory::IpAssignment,
        RiskCategory::UnlimitedLiability,
        RiskCategory::ExclusiveDealing,
        RiskCategory::PersonalGuarantee,
    ];
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskCategory::Penalty => "Penalty/Liquidated Damages",
            RiskCategory::Indemnification => "Indemnification",
            RiskCategory::UnilateralTermination => "Unilateral Termination",
            RiskCategory::ArbitrationJurisdiction => "Arbitration/Jurisdiction",
            RiskCategory::AutoRenewal => "Auto-Renewal",
            RiskCategory::NonCompete => "Non-Compete",
            RiskCategory::IpAssignment => "IP Assignment",
            RiskCategory::UnlimitedLiability => "Unlimited Liability",
            RiskCategory::ExclusiveDealing => "Exclusive Dealing",
            RiskCategory::PersonalGuarantee => "Personal Guarantee",
        };
        f.write_str(name)
    }
}

/// Ordinal risk level. `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// One level up, saturating at `High`.
    pub fn raise(self) -> Self {
        match self {
            Severity::Low => Severity::Medium,
            Severity::Medium | Severity::High => Severity::High,
        }
    }

    /// One level down, saturating at `Low`.
    pub fn lower(self) -> Self {
        match self {
            Severity::High => Severity::Medium,
            Severity::Medium | Severity::Low => Severity::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What else a clause must contain for a trigger match to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precondition {
    None,
    /// A monetary amount in the same clause
    MonetaryAmount,
    /// A duration in the same clause
    Duration,
}

/// Structured explanation attached to every finding of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rationale {
    pub description: String,
    pub business_impact: String,
    /// Who the provision favors
    pub favors: String,
    /// Why a small business should care
    pub concern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCategoryDef {
    pub category: RiskCategory,
    pub base_severity: Severity,
    /// Case-insensitive regular expressions, strongest first
    pub triggers: Vec<String>,
    pub precondition: Precondition,
    pub rationale: Rationale,
}

/// A favorable provision that lowers the severity of findings in its clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mitigation {
    pub name: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCatalog {
    pub categories: Vec<RiskCategoryDef>,
    /// Words that suppress a trigger when they precede it
    pub negation_cues: Vec<String>,
    /// How many words before a trigger are searched for a negation cue
    pub negation_window: usize,
    pub mitigations: Vec<Mitigation>,
}

impl Default for RiskCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn rationale(description: &str, business_impact: &str, favors: &str, concern: &str) -> Rationale {
    Rationale {
        description: description.to_string(),
        business_impact: business_impact.to_string(),
        favors: favors.to_string(),
        concern: concern.to_string(),
    }
}

fn category(
    category: RiskCategory,
    base_severity: Severity,
    precondition: Precondition,
    triggers: &[&str],
    rationale: Rationale,
) -> RiskCategoryDef {
    RiskCategoryDef {
        category,
        base_severity,
        triggers: triggers.iter().map(|t| t.to_string()).collect(),
        precondition,
        rationale,
    }
}

impl RiskCatalog {
    /// The built-in catalog.
    pub fn standard() -> Self {
        use Precondition as P;
        use RiskCategory::*;
        use Severity::*;

        let categories = vec![
            category(
                Penalty,
                High,
                P::MonetaryAmount,
                &[
                    r"\bliquidated\s+damages\b",
                    r"\bpenalt(?:y|ies)\b",
                    r"\bforfeit(?:s|ed|ure)?\b",
                    r"\bdamages\b[^.;]*?\bper\s+day\b",
                ],
                rationale(
                    "Penalty or liquidated damages clause",
                    "Financial penalties for delays or breaches",
                    "Other party (client/vendor)",
                    "Can result in significant unexpected costs",
                ),
            ),
            category(
                Indemnification,
                High,
                P::None,
                &[
                    r"\bindemnif(?:y|ies|ied|ication)\b",
                    r"\bindemnity\b",
                    r"\bhold\s+(?:\w+\s+){0,3}harmless\b",
                ],
                rationale(
                    "Indemnity clause requiring protection of other party",
                    "Liability for third-party claims and damages",
                    "Other party being indemnified",
                    "Unlimited liability exposure beyond your control",
                ),
            ),
            category(
                UnilateralTermination,
                High,
                P::None,
                &[
                    r"\bterminat\w*\b[^.;]*?\b(?:without\s+(?:any\s+)?(?:cause|notice|reason)|at\s+will|(?:its|his|her|their)?\s*sole\s+discretion|at\s+any\s+time)",
                    r"\bimmediate\s+termination\b",
                ],
                rationale(
                    "Unilateral termination rights",
                    "Contract can be ended without mutual agreement",
                    "Party with termination rights",
                    "Loss of business continuity and planning certainty",
                ),
            ),
            category(
                ArbitrationJurisdiction,
                Medium,
                P::None,
                &[
                    r"\barbitrat(?:ion|or|ors)\b",
                    r"\bexclusive\s+jurisdiction\b",
                    r"\bjurisdiction\s+of\s+(?:the\s+)?courts?\b",
                    r"\bdisputes?\b[^.;]*?\bresolved\b[^.;]*?\b(?:in|at)\s+\w+",
                ],
                rationale(
                    "Jurisdiction or arbitration location clause",
                    "Legal disputes must be resolved in specific location",
                    "Party in the specified jurisdiction",
                    "Additional travel and legal costs for dispute resolution",
                ),
            ),
            category(
                AutoRenewal,
                Medium,
                P::None,
                &[
                    r"\bautomatic(?:ally)?\s+renew(?:s|ed|al)?\b",
                    r"\bauto[\s\-]?renew(?:s|al)?\b",
                    r"\b(?:renew|extend)(?:s|ed)?\s+automatically\b",
                    r"\bevergreen\b",
                ],
                rationale(
                    "Automatic renewal clause",
                    "Contract continues without active decision",
                    "Service provider or vendor",
                    "Difficulty exiting unfavorable agreements",
                ),
            ),
            category(
                NonCompete,
                Medium,
                P::None,
                &[
                    r"\bnon[\s\-]?compet(?:e|ition)\b",
                    r"\brestraint\s+of\s+trade\b",
                    r"\bnot\b[^.;]*?\bcompet(?:e|es|ing|ition|itor|itors)\b",
                    r"\bsolicit\b[^.;]*?\b(?:employees|customers|clients)\b",
                ],
                rationale(
                    "Non-compete or restraint clause",
                    "Restrictions on business activities after contract ends",
                    "Other party seeking protection",
                    "Limits future business opportunities and growth",
                ),
            ),
            category(
                IpAssignment,
                High,
                P::None,
                &[
                    r"\bintellectual\s+property\b[^.;]*?\bassign",
                    r"\bassign(?:s|ed|ment)?\b[^.;]*?\b(?:intellectual\s+property|copyrights?|inventions?|patents?)\b",
                    r"\bwork\s+(?:made\s+)?for\s+hire\b",
                    r"\binventions?\b[^.;]*?\b(?:belong|vest)",
                    r"\bwaive[sd]?\b[^.;]*?\bmoral\s+rights\b",
                ],
                rationale(
                    "Intellectual property assignment",
                    "Loss of ownership of created work or inventions",
                    "Party receiving IP rights",
                    "Loss of valuable intellectual assets and future revenue",
                ),
            ),
            category(
                UnlimitedLiability,
                High,
                P::None,
                &[
                    r"\bunlimited\s+liabilit(?:y|ies)\b",
                    r"\bliabilit(?:y|ies)\b[^.;]*?\bnot\s+(?:be\s+)?(?:limited|capped)\b",
                    r"\bfull\s+liability\b",
                    r"\bliable\b[^.;]*?\ball\s+(?:losses|damages)\b",
                    r"\bno\s+(?:cap|limit)\b[^.;]*?\bliabilit(?:y|ies)\b",
                ],
                rationale(
                    "Unlimited liability clause",
                    "No limit on financial exposure for damages",
                    "Other party seeking compensation",
                    "Catastrophic financial risk beyond business capacity",
                ),
            ),
            category(
                ExclusiveDealing,
                Medium,
                P::None,
                &[
                    r"\bexclusive(?:ly)?\b[^.;]*?\b(?:supplier|vendor|distribut\w*|purchase\w*|dealings?)\b",
                    r"\bsole\s+(?:supplier|vendor|distributor)\b",
                    r"\bnot\b[^.;]*?\bengage\b[^.;]*?\bcompetitors\b",
                ],
                rationale(
                    "Exclusive dealing arrangement",
                    "Restriction to single supplier or customer",
                    "Exclusive partner",
                    "Loss of negotiating power and market flexibility",
                ),
            ),
            category(
                PersonalGuarantee,
                High,
                P::None,
                &[
                    r"\bpersonal(?:ly)?\s+guarantee[sd]?\b",
                    r"\bpersonally\s+liable\b",
                    r"\bdirectors?\b[^.;]*?\bguarantee",
                    r"\b(?:individual\s+guarantee|personal\s+surety)\b",
                ],
                rationale(
                    "Personal guarantee requirement",
                    "Personal assets at risk for business obligations",
                    "Creditor or service provider",
                    "Personal financial exposure beyond business assets",
                ),
            ),
        ];

        let mitigations = vec![
            Mitigation {
                name: "liability_cap".to_string(),
                patterns: vec![
                    r"\b(?:limited|capped)\s+to\b[^.;]*?(?:₹|\brs\b|\binr\b|\$|€|£|\d|\bfees\b|\bcontract\s+value\b)".to_string(),
                    r"\bmaximum\s+(?:aggregate\s+)?liability\b".to_string(),
                    r"\bcap\s+on\s+(?:its\s+|their\s+)?liability\b".to_string(),
                    r"\bliabilit(?:y|ies)\b[^.;]*?\bshall\s+not\s+exceed\b".to_string(),
                ],
            },
            Mitigation {
                name: "mutual_termination".to_string(),
                patterns: vec![
                    r"\beither\s+party\b[^.;]*?\bterminat".to_string(),
                    r"\bmutual(?:ly)?\b[^.;]*?\bterminat".to_string(),
                ],
            },
            Mitigation {
                name: "force_majeure".to_string(),
                patterns: vec![
                    r"\bforce\s+majeure\b".to_string(),
                    r"\bact\s+of\s+god\b".to_string(),
                    r"\bcircumstances\s+beyond\b[^.;]*?\bcontrol\b".to_string(),
                ],
            },
        ];

        Self {
            categories,
            negation_cues: ["not", "no", "never", "neither", "nor", "cannot", "n't"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            negation_window: 5,
            mitigations,
        }
    }
}

#[derive(Debug)]
pub struct CompiledCategory {
    pub category: RiskCategory,
    pub base_severity: Severity,
    pub precondition: Precondition,
    pub rationale: Rationale,
    /// (source pattern, compiled) in catalog order
    pub triggers: Vec<(String, Regex)>,
}

#[derive(Debug)]
pub struct CompiledMitigation {
    pub name: String,
    pub patterns: Vec<Regex>,
}

/// A validated, compiled catalog.
#[derive(Debug)]
pub struct CompiledCatalog {
    categories: Vec<CompiledCategory>,
    negation_cues: HashSet<String>,
    negation_window: usize,
    mitigations: Vec<CompiledMitigation>,
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl CompiledCatalog {
    pub fn compile(catalog: &RiskCatalog) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(catalog.categories.len());

        for def in &catalog.categories {
            if !seen.insert(def.category) {
                return Err(CatalogError::DuplicateCategory(def.category.to_string()));
            }
            if def.triggers.is_empty() {
                return Err(CatalogError::NoTriggers(def.category.to_string()));
            }
            let triggers = def
                .triggers
                .iter()
                .map(|pattern| {
                    compile_pattern(pattern)
                        .map(|regex| (pattern.clone(), regex))
                        .map_err(|e| CatalogError::InvalidTrigger {
                            category: def.category.to_string(),
                            pattern: pattern.clone(),
                            message: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            categories.push(CompiledCategory {
                category: def.category,
                base_severity: def.base_severity,
                precondition: def.precondition,
                rationale: def.rationale.clone(),
                triggers,
            });
        }

        let mitigations = catalog
            .mitigations
            .iter()
            .map(|m| {
                let patterns = m
                    .patterns
                    .iter()
                    .map(|p| compile_pattern(p))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| CatalogError::InvalidMitigation {
                        name: m.name.clone(),
                        message: e.to_string(),
                    })?;
                Ok(CompiledMitigation {
                    name: m.name.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        tracing::debug!(
            categories = categories.len(),
            mitigations = mitigations.len(),
            "compiled risk catalog"
        );

        Ok(Self {
            categories,
            negation_cues: catalog
                .negation_cues
                .iter()
                .map(|c| c.to_lowercase())
                .collect(),
            negation_window: catalog.negation_window,
            mitigations,
        })
    }

    pub fn categories(&self) -> &[CompiledCategory] {
        &self.categories
    }

    pub fn category(&self, category: RiskCategory) -> Option<&CompiledCategory> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Whether a negation cue sits among the last `negation_window` words
    /// before byte `start`, without crossing `,` `;` or `:`.
    pub fn is_negated(&self, text: &str, start: usize) -> bool {
        let prefix = &text[..start];
        let segment = prefix
            .rfind(|c| matches!(c, ',' | ';' | ':'))
            .map_or(prefix, |at| &prefix[at + 1..]);

        let words = word_indices(segment);
        words
            .iter()
            .rev()
            .take(self.negation_window)
            .any(|(_, word)| self.is_negation_cue(word))
    }

    fn is_negation_cue(&self, word: &str) -> bool {
        let lower = word.to_lowercase().replace('’', "'");
        if self.negation_cues.contains(&lower) {
            return true;
        }
        // "n't" matches contractions: "won't", "doesn't"
        self.negation_cues
            .iter()
            .any(|cue| cue.starts_with("n'") && lower.ends_with(cue.as_str()))
    }

    /// Names of mitigations present (and not negated) in `text`.
    pub fn mitigations_in(&self, text: &str) -> Vec<&str> {
        self.mitigations
            .iter()
            .filter(|m| {
                m.patterns.iter().any(|p| {
                    p.find_iter(text)
                        .any(|found| !self.is_negated(text, found.start()))
                })
            })
            .map(|m| m.name.as_str())
            .collect()
    }
}
