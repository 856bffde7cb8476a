//! Contract parties and their role tags.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::normalize_party_name;
use crate::{ContractType, DefinedTerm};

/// Role a party plays, as named by the contract's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Employer,
    Employee,
    Company,
    Contractor,
    Consultant,
    Vendor,
    Supplier,
    Buyer,
    Client,
    Customer,
    ServiceProvider,
    Lessor,
    Lessee,
    Landlord,
    Tenant,
    Licensor,
    Licensee,
    Partner,
    DisclosingParty,
    ReceivingParty,
    Guarantor,
}

impl PartyRole {
    /// Map a defined term or role noun ("Service Provider", "Tenants") to a role.
    pub fn from_term(term: &str) -> Option<Self> {
        let normalized = normalize_party_name(term);
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        let role = match singular {
            "employer" => PartyRole::Employer,
            "employee" => PartyRole::Employee,
            "company" | "companie" => PartyRole::Company,
            "contractor" => PartyRole::Contractor,
            "consultant" => PartyRole::Consultant,
            "vendor" | "seller" => PartyRole::Vendor,
            "supplier" => PartyRole::Supplier,
            "buyer" | "purchaser" => PartyRole::Buyer,
            "client" => PartyRole::Client,
            "customer" => PartyRole::Customer,
            "service provider" => PartyRole::ServiceProvider,
            "lessor" => PartyRole::Lessor,
            "lessee" => PartyRole::Lessee,
            "landlord" => PartyRole::Landlord,
            "tenant" => PartyRole::Tenant,
            "licensor" => PartyRole::Licensor,
            "licensee" => PartyRole::Licensee,
            "partner" => PartyRole::Partner,
            "disclosing party" => PartyRole::DisclosingParty,
            "receiving party" => PartyRole::ReceivingParty,
            "guarantor" | "surety" => PartyRole::Guarantor,
            _ => return None,
        };
        Some(role)
    }

    /// The contract type this role tag votes for, if any.
    pub fn implied_contract_type(self) -> Option<ContractType> {
        use PartyRole::*;
        match self {
            Employer | Employee => Some(ContractType::Employment),
            DisclosingParty | ReceivingParty => Some(ContractType::Nda),
            Vendor | Supplier | Buyer => Some(ContractType::VendorSupplier),
            ServiceProvider | Client | Consultant => Some(ContractType::Service),
            Lessor | Lessee | Landlord | Tenant => Some(ContractType::Lease),
            Partner => Some(ContractType::Partnership),
            Company | Contractor | Customer | Licensor | Licensee | Guarantor => None,
        }
    }
}

/// A named party to the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Display name: the legal name when one was defined, else the role noun
    pub name: String,
    pub role: Option<PartyRole>,
    /// Defined-term alias ("Employer" for "ABC Pvt. Ltd.")
    pub alias: Option<String>,
}

impl Party {
    /// Lowercased names this party can be referred to by.
    pub fn mentions(&self) -> Vec<String> {
        let mut names = vec![normalize_party_name(&self.name)];
        if let Some(alias) = &self.alias {
            names.push(normalize_party_name(alias));
        }
        names
    }
}

/// Role nouns, multi-word forms first.
pub(crate) const ROLE_NOUNS: [&str; 23] = [
    "Disclosing Party",
    "Receiving Party",
    "Service Provider",
    "Employer",
    "Employee",
    "Company",
    "Contractor",
    "Consultant",
    "Vendor",
    "Seller",
    "Supplier",
    "Buyer",
    "Purchaser",
    "Client",
    "Customer",
    "Lessor",
    "Lessee",
    "Landlord",
    "Tenant",
    "Licensor",
    "Licensee",
    "Partner",
    "Guarantor",
];

#[allow(clippy::unwrap_used)] // Built from constant role nouns
static ROLE_NOUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({})s?\b", ROLE_NOUNS.join("|"))).unwrap());

/// A capitalized name: "ABC Pvt. Ltd.", "Rao & Sons", "XYZ Corp".
const NAME: &str = r"[A-Z][A-Za-z0-9'.\-]*(?:\s+(?:&\s+)?[A-Z][A-Za-z0-9'.\-]*){0,7}";

/// Company suffixes whose trailing period belongs to the name.
const NAME_ABBREVIATIONS: [&str; 8] = ["ltd", "pvt", "corp", "inc", "co", "llc", "llp", "plc"];

#[allow(clippy::unwrap_used)] // Built from a constant name pattern
static BETWEEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:[Bb]etween|BETWEEN)\s+({NAME})\s*,?\s+(?:and|AND)\s+({NAME})")).unwrap()
});

#[allow(clippy::unwrap_used)] // Built from a constant name pattern
static NUMBERED_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i:party\s+of\s+the\s+(?:first|second)\s+part)[:,]?\s+({NAME})")).unwrap()
});

/// Collects parties from definitions and capitalized role nouns.
///
/// Parties are an ordered set: the first mention wins and later mentions of
/// the same name or alias are dropped.
#[derive(Debug, Default)]
pub struct PartyCollector {
    parties: Vec<Party>,
}

impl PartyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record parties declared by a definition ("ABC Ltd (the "Vendor")").
    pub fn add_definition(&mut self, term: &DefinedTerm) {
        let role = PartyRole::from_term(&term.term_name);
        // "Confidential Information" means ... is not a party
        if role.is_none() && term.referent.is_none() {
            return;
        }
        let party = match &term.referent {
            Some(referent) => Party {
                name: referent.clone(),
                role,
                alias: Some(term.term_name.clone()),
            },
            None => Party {
                name: term.term_name.clone(),
                role,
                alias: None,
            },
        };
        self.push(party);
    }

    /// Record parties named in a recital: "between ABC Pvt. Ltd. and XYZ
    /// Corp." or "party of the first part: ABC Ltd".
    pub fn add_named_parties(&mut self, text: &str) {
        let between = BETWEEN
            .captures_iter(text)
            .flat_map(|caps| [caps.get(1), caps.get(2)]);
        let numbered = NUMBERED_PART.captures_iter(text).map(|caps| caps.get(1));

        for found in between.chain(numbered).flatten() {
            let Some(name) = clean_name(found.as_str()) else {
                continue;
            };
            let role = PartyRole::from_term(&name);
            self.push(Party {
                name,
                role,
                alias: None,
            });
        }
    }

    /// Record capitalized role nouns used in `text`.
    pub fn add_role_nouns(&mut self, text: &str) {
        for caps in ROLE_NOUN.captures_iter(text) {
            let Some(noun) = caps.get(1) else { continue };
            let role = PartyRole::from_term(noun.as_str());
            self.push(Party {
                name: noun.as_str().to_string(),
                role,
                alias: None,
            });
        }
    }

    fn push(&mut self, party: Party) {
        let incoming = party.mentions();
        if let Some(existing) = self
            .parties
            .iter_mut()
            .find(|p| p.mentions().iter().any(|m| incoming.contains(m)))
        {
            // A definition seen after a bare role noun upgrades the entry
            if existing.alias.is_none() && party.alias.is_some() {
                *existing = party;
            }
            return;
        }
        self.parties.push(party);
    }

    pub fn finish(self) -> Vec<Party> {
        self.parties
    }
}

/// Drop a leading article and a sentence-final period; `None` when nothing
/// but an article or "This Agreement" is left.
fn clean_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    for article in ["The ", "THE "] {
        if let Some(rest) = name.strip_prefix(article) {
            name = rest.trim_start();
        }
    }

    if let Some(stem) = name.strip_suffix('.') {
        let last = stem.rsplit(char::is_whitespace).next().unwrap_or(stem);
        if !NAME_ABBREVIATIONS.contains(&last.to_ascii_lowercase().as_str()) {
            name = stem;
        }
    }

    let normalized = normalize_party_name(name);
    if normalized.is_empty() || normalized.starts_with("this ") || normalized == "agreement" {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefinitionType;

    fn definition(term: &str, referent: Option<&str>) -> DefinedTerm {
        DefinedTerm {
            term_name: term.to_string(),
            definition_type: DefinitionType::Hereinafter,
            referent: referent.map(str::to_string),
            span: 0..0,
        }
    }

    #[test]
    fn role_from_terms() {
        assert_eq!(PartyRole::from_term("the Employer"), Some(PartyRole::Employer));
        assert_eq!(PartyRole::from_term("Tenants"), Some(PartyRole::Tenant));
        assert_eq!(
            PartyRole::from_term("Service Provider"),
            Some(PartyRole::ServiceProvider)
        );
        assert_eq!(PartyRole::from_term("Confidential Information"), None);
    }

    #[test]
    fn definitions_and_role_nouns_dedupe() {
        let mut collector = PartyCollector::new();
        collector.add_role_nouns("The Employer may assign duties to the Employee.");
        collector.add_definition(&definition("Employer", Some("ABC Pvt. Ltd.")));
        collector.add_role_nouns("Employees shall report to the Employer.");
        let parties = collector.finish();

        assert_eq!(
            parties,
            vec![
                Party {
                    name: "ABC Pvt. Ltd.".into(),
                    role: Some(PartyRole::Employer),
                    alias: Some("Employer".into()),
                },
                Party {
                    name: "Employee".into(),
                    role: Some(PartyRole::Employee),
                    alias: None,
                },
            ]
        );
    }

    #[test]
    fn parties_named_between() {
        let mut collector = PartyCollector::new();
        collector.add_named_parties("This agreement is made between ABC Pvt. Ltd. and XYZ Corp.");
        let names: Vec<String> = collector.finish().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["ABC Pvt. Ltd.", "XYZ Corp."]);
    }

    #[test]
    fn between_names_stop_at_lowercase_words() {
        let mut collector = PartyCollector::new();
        collector.add_named_parties(
            "This Lease is entered into between Ravi Kumar, and Sunrise Estates LLP on 1 March 2024.",
        );
        let parties = collector.finish();
        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].name, "Ravi Kumar");
        assert_eq!(parties[1].name, "Sunrise Estates LLP");
    }

    #[test]
    fn between_role_nouns_carry_roles() {
        let mut collector = PartyCollector::new();
        collector.add_named_parties("The agreement between The Landlord and The Tenant.");
        let roles: Vec<Option<PartyRole>> = collector.finish().into_iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![Some(PartyRole::Landlord), Some(PartyRole::Tenant)]);
    }

    #[test]
    fn parties_of_the_first_and_second_part() {
        let mut collector = PartyCollector::new();
        collector.add_named_parties("Mehta Traders, party of the first part, sells to the party of the second part: Gupta Exports.");
        let names: Vec<String> = collector.finish().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Gupta Exports"]);
    }

    #[test]
    fn later_definition_upgrades_named_party() {
        let mut collector = PartyCollector::new();
        collector.add_named_parties("This agreement is made between ABC Pvt. Ltd. and Ravi Kumar.");
        collector.add_definition(&definition("Employer", Some("ABC Pvt. Ltd.")));
        let parties = collector.finish();
        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].alias.as_deref(), Some("Employer"));
        assert_eq!(parties[0].role, Some(PartyRole::Employer));
    }

    #[test]
    fn lowercase_role_nouns_are_ignored() {
        let mut collector = PartyCollector::new();
        collector.add_role_nouns("any employee or tenant");
        assert!(collector.finish().is_empty());
    }
}
