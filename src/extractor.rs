//! Entity and structure extraction.
//!
//! Runs every per-clause resolver, collects parties across the whole document,
//! then classifies clause roles, clause topics and the contract type from what
//! was found.

use serde::{Deserialize, Serialize};

use crate::{
    AmountResolver, Clause, ClauseRoleResolver, ClauseTopicResolver, ContractClassifier,
    ContractType, DateExpression, DefinedTerm, DefinedTermResolver, DurationExpression,
    MonetaryAmount, Party, PartyCollector, Provision, ProvisionResolver, Scored, TemporalResolver,
    VagueTerm, VagueTermResolver,
};

/// Contract-scoped attributes derived from the full clause sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractProfile {
    pub contract_type: Scored<ContractType>,
    /// Ordered set of parties, by first mention
    pub parties: Vec<Party>,
    pub defined_terms: Vec<DefinedTerm>,
    pub monetary_amounts: Vec<MonetaryAmount>,
    pub dates: Vec<DateExpression>,
    pub durations: Vec<DurationExpression>,
    pub vague_terms: Vec<VagueTerm>,
    /// Obligations, rights and prohibitions, in clause order
    pub provisions: Vec<Provision>,
}

impl ContractProfile {
    pub fn amounts_in(&self, clause_index: usize) -> impl Iterator<Item = &MonetaryAmount> {
        self.monetary_amounts
            .iter()
            .filter(move |a| a.clause_index == clause_index)
    }

    pub fn durations_in(&self, clause_index: usize) -> impl Iterator<Item = &DurationExpression> {
        self.durations
            .iter()
            .filter(move |d| d.clause_index == clause_index)
    }

    pub fn provisions_in(&self, clause_index: usize) -> impl Iterator<Item = &Provision> {
        self.provisions
            .iter()
            .filter(move |p| p.clause_index == clause_index)
    }
}

/// Output of [`EntityExtractor::extract`].
#[derive(Debug, Clone)]
pub struct Extraction {
    pub profile: ContractProfile,
    /// Copies of the input clauses with role, topic and ambiguity set
    pub clauses: Vec<Clause>,
}

pub struct EntityExtractor {
    classifier: ContractClassifier,
    definitions: DefinedTermResolver,
    amounts: AmountResolver,
    temporal: TemporalResolver,
    vague: VagueTermResolver,
    provisions: ProvisionResolver,
    roles: ClauseRoleResolver,
    topics: ClauseTopicResolver,
}

impl EntityExtractor {
    pub fn new(classifier: ContractClassifier) -> Self {
        Self {
            classifier,
            definitions: DefinedTermResolver::new(),
            amounts: AmountResolver::new(),
            temporal: TemporalResolver::new(),
            vague: VagueTermResolver::new(),
            provisions: ProvisionResolver::new(),
            roles: ClauseRoleResolver::new(),
            topics: ClauseTopicResolver::new(),
        }
    }

    /// Never fails: anything that is not recognized is simply left out.
    pub fn extract(&self, clauses: &[Clause]) -> Extraction {
        let mut collector = PartyCollector::new();
        let mut defined_terms = Vec::new();
        let mut monetary_amounts = Vec::new();
        let mut dates = Vec::new();
        let mut durations = Vec::new();
        let mut vague_terms = Vec::new();
        let mut provisions = Vec::new();

        for clause in clauses {
            let (index, text) = (clause.index(), clause.text());

            collector.add_named_parties(text);
            for term in self.definitions.find(text) {
                collector.add_definition(&term.value);
                defined_terms.push(term.value);
            }
            collector.add_role_nouns(text);

            monetary_amounts.extend(self.amounts.find(index, text));
            dates.extend(self.temporal.dates(index, text));
            durations.extend(self.temporal.durations(index, text));
            vague_terms.extend(self.vague.find(index, text));
            provisions.extend(self.provisions.find(index, text));
        }

        let parties = collector.finish();

        let annotated: Vec<Clause> = clauses
            .iter()
            .map(|clause| {
                let annotation = self.roles.classify(clause, &parties);
                let topic = self.topics.classify(clause.text());
                clause.annotated(annotation.role, topic, annotation.ambiguity_flag)
            })
            .collect();

        let contract_type = self.classifier.classify(&annotated, &parties);

        tracing::debug!(
            contract_type = %contract_type.value,
            parties = parties.len(),
            amounts = monetary_amounts.len(),
            dates = dates.len(),
            durations = durations.len(),
            vague_terms = vague_terms.len(),
            provisions = provisions.len(),
            "extracted contract profile"
        );

        Extraction {
            profile: ContractProfile {
                contract_type,
                parties,
                defined_terms,
                monetary_amounts,
                dates,
                durations,
                vague_terms,
                provisions,
            },
            clauses: annotated,
        }
    }
}
