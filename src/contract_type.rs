//! Contract type classification by weighted vote.
//!
//! Every phrase match anywhere in the document adds its weight to the type it
//! signals, and every party whose role tag implies a type adds `role_weight`.
//! The type with the highest vote above `threshold` wins; ties go to the
//! earlier type in [`ContractType::PRIORITY`]. Clause roles reach the vote
//! through the parties they bind, not as votes of their own.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::hindi::normalize_hindi_terms;
use crate::{CatalogError, Clause, Party, Scored};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Employment,
    VendorSupplier,
    Service,
    Nda,
    Lease,
    Partnership,
    Unknown,
}

impl ContractType {
    /// Tie-break order: earlier wins.
    pub const PRIORITY: [ContractType; 6] = [
        ContractType::Employment,
        ContractType::Nda,
        ContractType::VendorSupplier,
        ContractType::Service,
        ContractType::Lease,
        ContractType::Partnership,
    ];
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractType::Employment => "Employment",
            ContractType::VendorSupplier => "Vendor/Supplier",
            ContractType::Service => "Service",
            ContractType::Nda => "NDA",
            ContractType::Lease => "Lease",
            ContractType::Partnership => "Partnership",
            ContractType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A phrase that votes for a contract type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePhrase {
    pub contract_type: ContractType,
    /// Case-insensitive regular expression
    pub pattern: String,
    pub weight: f64,
}

/// Vote weights and threshold for contract type classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub phrases: Vec<TypePhrase>,
    /// Vote added per party whose role implies a type
    pub role_weight: f64,
    /// A type's vote must exceed this to win
    pub threshold: f64,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClassifierRules {
    pub fn standard() -> Self {
        use ContractType::*;
        let table: [(ContractType, f64, &[&str]); 12] = [
            (
                Employment,
                3.0,
                &[
                    r"\bemployment\s+(?:agreement|contract)\b",
                    r"\bappointment\s+letter\b",
                    r"\boffer\s+of\s+employment\b",
                    r"\bjob\s+offer\b",
                ],
            ),
            (Employment, 1.0, &[r"\bemployment\b", r"\bsalary\b", r"\bprobation\b"]),
            (
                Nda,
                3.0,
                &[
                    r"\bnon[\s\-]?disclosure\s+agreement\b",
                    r"\bconfidentiality\s+agreement\b",
                    r"\bsecrecy\s+agreement\b",
                    r"\bNDA\b",
                ],
            ),
            (
                Nda,
                1.0,
                &[r"\bnon[\s\-]?disclosure\b", r"\bproprietary\s+information\b"],
            ),
            (
                VendorSupplier,
                3.0,
                &[
                    r"\bvendor\s+agreement\b",
                    r"\bsupplier\s+(?:agreement|contract)\b",
                    r"\bsupply\s+agreement\b",
                    r"\bprocurement\s+contract\b",
                    r"\bpurchase\s+order\b",
                ],
            ),
            (VendorSupplier, 1.0, &[r"\bgoods\b", r"\bpurchase\s+price\b"]),
            (
                Service,
                3.0,
                &[
                    r"\bservices?\s+agreement\b",
                    r"\bconsulting\s+agreement\b",
                    r"\bservice\s+contract\b",
                    r"\bwork\s+order\b",
                ],
            ),
            (
                Service,
                1.0,
                &[r"\bprofessional\s+services\b", r"\bstatement\s+of\s+work\b"],
            ),
            (
                Lease,
                3.0,
                &[
                    r"\blease\s+(?:agreement|deed)\b",
                    r"\brent(?:al)?\s+agreement\b",
                    r"\btenancy\s+agreement\b",
                ],
            ),
            (
                Lease,
                1.0,
                &[r"\bpremises\b", r"\bmonthly\s+rent\b", r"\bsecurity\s+deposit\b"],
            ),
            (
                Partnership,
                3.0,
                &[
                    r"\bpartnership\s+(?:deed|agreement)\b",
                    r"\bjoint\s+venture\b",
                    r"\bcollaboration\s+agreement\b",
                ],
            ),
            (
                Partnership,
                1.0,
                &[r"\bprofits?\s+and\s+loss(?:es)?\b", r"\bcapital\s+contribution\b"],
            ),
        ];

        let phrases = table
            .iter()
            .flat_map(|(contract_type, weight, patterns)| {
                patterns.iter().map(move |pattern| TypePhrase {
                    contract_type: *contract_type,
                    pattern: pattern.to_string(),
                    weight: *weight,
                })
            })
            .collect();

        Self {
            phrases,
            role_weight: 1.0,
            threshold: 0.5,
        }
    }
}

/// Compiled [`ClassifierRules`].
#[derive(Debug)]
pub struct ContractClassifier {
    phrases: Vec<(ContractType, Regex, f64)>,
    role_weight: f64,
    threshold: f64,
}

impl ContractClassifier {
    pub fn compile(rules: &ClassifierRules) -> Result<Self, CatalogError> {
        for (name, value) in [("role_weight", rules.role_weight), ("threshold", rules.threshold)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CatalogError::InvalidScoringParameter { name, value });
            }
        }

        let phrases = rules
            .phrases
            .iter()
            .map(|phrase| {
                let regex = RegexBuilder::new(&phrase.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| CatalogError::InvalidClassifierPhrase {
                        pattern: phrase.pattern.clone(),
                        message: e.to_string(),
                    })?;
                if !phrase.weight.is_finite() || phrase.weight < 0.0 {
                    return Err(CatalogError::InvalidClassifierPhrase {
                        pattern: phrase.pattern.clone(),
                        message: format!("weight must be non-negative, got {}", phrase.weight),
                    });
                }
                Ok((phrase.contract_type, regex, phrase.weight))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            phrases,
            role_weight: rules.role_weight,
            threshold: rules.threshold,
        })
    }

    /// Weighted votes per type, in [`ContractType::PRIORITY`] order.
    pub fn votes(&self, clauses: &[Clause], parties: &[Party]) -> Vec<(ContractType, f64)> {
        let mut votes: Vec<(ContractType, f64)> =
            ContractType::PRIORITY.iter().map(|t| (*t, 0.0)).collect();
        let mut add = |contract_type: ContractType, weight: f64| {
            if let Some(slot) = votes.iter_mut().find(|(t, _)| *t == contract_type) {
                slot.1 += weight;
            }
        };

        let texts: Vec<_> = clauses.iter().map(|c| normalize_hindi_terms(c.text())).collect();
        for (contract_type, regex, weight) in &self.phrases {
            let hits: usize = texts.iter().map(|text| regex.find_iter(text).count()).sum();
            add(*contract_type, *weight * hits as f64);
        }

        for party in parties {
            if let Some(contract_type) = party.role.and_then(|r| r.implied_contract_type()) {
                add(contract_type, self.role_weight);
            }
        }

        votes
    }

    pub fn classify(&self, clauses: &[Clause], parties: &[Party]) -> Scored<ContractType> {
        let votes = self.votes(clauses, parties);

        let mut best: Option<(ContractType, f64)> = None;
        for (contract_type, vote) in votes {
            if vote <= self.threshold {
                continue;
            }
            // strict: an equal vote later in priority order never displaces
            if best.map_or(true, |(_, top)| vote > top) {
                best = Some((contract_type, vote));
            }
        }

        match best {
            Some((contract_type, vote)) => {
                Scored::rule_based(contract_type, (vote / 10.0).min(1.0), "weighted_vote")
            }
            None => {
                tracing::warn!("no contract type reached the classification threshold");
                Scored::rule_based(ContractType::Unknown, 1.0, "below_threshold")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClauseSegmenter, PartyRole, ScoreSource};

    fn classify(text: &str, parties: &[Party]) -> Scored<ContractType> {
        let clauses = ClauseSegmenter::new().segment(text).unwrap();
        ContractClassifier::compile(&ClassifierRules::standard())
            .unwrap()
            .classify(&clauses, parties)
    }

    fn party(name: &str, role: PartyRole) -> Party {
        Party {
            name: name.to_string(),
            role: Some(role),
            alias: None,
        }
    }

    #[test]
    fn title_phrase_wins() {
        let scored = classify("THIS LEASE AGREEMENT is made on 1 March 2024.", &[]);
        assert_eq!(scored.value, ContractType::Lease);
        assert_eq!(scored.confidence, 0.3);
    }

    #[test]
    fn equal_votes_break_by_priority() {
        let scored = classify("This agreement covers employment and non-disclosure.", &[]);
        assert_eq!(scored.value, ContractType::Employment);
    }

    #[test]
    fn role_tags_vote() {
        let parties = [
            party("Landlord", PartyRole::Landlord),
            party("Tenant", PartyRole::Tenant),
        ];
        let scored = classify("The parties agree as follows.", &parties);
        assert_eq!(scored.value, ContractType::Lease);
        assert_eq!(scored.confidence, 0.2);
    }

    #[test]
    fn vote_equal_to_threshold_does_not_win() {
        let clauses = ClauseSegmenter::new().segment("The salary is paid monthly.").unwrap();

        let standard = ContractClassifier::compile(&ClassifierRules::standard()).unwrap();
        assert_eq!(standard.classify(&clauses, &[]).value, ContractType::Employment);

        let strict = ContractClassifier::compile(&ClassifierRules {
            threshold: 1.0,
            ..ClassifierRules::standard()
        })
        .unwrap();
        let scored = strict.classify(&clauses, &[]);
        assert_eq!(scored.value, ContractType::Unknown);
        assert_eq!(
            scored.source,
            ScoreSource::RuleBased {
                rule_name: "below_threshold".into()
            }
        );
    }

    #[test]
    fn hindi_title_votes() {
        let scored = classify("यह रोजगार करार 1 मार्च 2024 को किया गया।", &[]);
        assert_eq!(scored.value, ContractType::Employment);
    }

    #[test]
    fn no_votes_is_unknown() {
        let scored = classify("The parties agree as follows.", &[]);
        assert_eq!(scored.value, ContractType::Unknown);
    }

    #[test]
    fn invalid_phrase_is_rejected() {
        let mut rules = ClassifierRules::standard();
        rules.phrases.push(TypePhrase {
            contract_type: ContractType::Service,
            pattern: "(unclosed".to_string(),
            weight: 1.0,
        });
        let err = ContractClassifier::compile(&rules).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidClassifierPhrase { .. }));
    }
}
