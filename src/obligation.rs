//! Clause role classification.
//!
//! Assigns each clause one [`ClauseRole`] from its modal keywords:
//!
//! | Cue | Role |
//! |---|---|
//! | "shall not", "cannot", "is prohibited from" | `Restriction` |
//! | "shall", "must", "is required to" after a party mention | `Obligation` |
//! | "may", "is entitled to", "shall not be required to" | `Right` |
//! | "means", "hereinafter", `(the "Term")` | `Definition` |
//!
//! Precedence is top to bottom. A clause is flagged ambiguous when it mixes
//! two or more of duty / permission / prohibition, or uses a personal pronoun
//! before any party has been mentioned in it.

use std::collections::HashSet;

use crate::party::ROLE_NOUNS;
use crate::utils::word_indices;
use crate::{
    Clause, ClauseRole, ContractKeyword, ContractKeywordResolver, DefinedTermResolver,
    KeywordMatch, ModalKind, Party,
};

const PERSONAL_PRONOUNS: [&str; 9] = ["he", "she", "him", "her", "his", "hers", "they", "them", "their"];

const GENERIC_SUBJECTS: [&str; 7] = ["party", "parties", "you", "we", "i", "each", "either"];

/// The role decision for one clause, with the keywords it was based on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAnnotation {
    pub role: ClauseRole,
    pub ambiguity_flag: bool,
    pub keywords: Vec<KeywordMatch>,
}

/// Classifies clause roles against the contract's known parties.
#[derive(Default)]
pub struct ClauseRoleResolver {
    keywords: ContractKeywordResolver,
    definitions: DefinedTermResolver,
}

impl ClauseRoleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, clause: &Clause, parties: &[Party]) -> RoleAnnotation {
        let text = clause.text();
        let keywords = self.keywords.find(text);
        let subjects = SubjectIndex::new(text, parties);

        let kinds: HashSet<ModalKind> = keywords.iter().filter_map(|k| k.keyword.modal_kind()).collect();
        let has = |kind: ModalKind| kinds.contains(&kind);

        let bound_duty = keywords.iter().any(|k| {
            k.keyword.modal_kind() == Some(ModalKind::Duty) && subjects.mentioned_before(k.span.start)
        });
        let definition = keywords
            .iter()
            .any(|k| matches!(k.keyword, ContractKeyword::Means | ContractKeyword::Hereinafter))
            || !self.definitions.find(text).is_empty();

        let role = if has(ModalKind::Prohibition) {
            ClauseRole::Restriction
        } else if bound_duty {
            ClauseRole::Obligation
        } else if has(ModalKind::Permission) {
            ClauseRole::Right
        } else if definition {
            ClauseRole::Definition
        } else {
            ClauseRole::Unclassified
        };

        let conflicting = kinds.len() >= 2;
        let dangling_pronoun = subjects
            .pronouns
            .iter()
            .any(|&at| !subjects.mentioned_before(at));

        RoleAnnotation {
            role,
            ambiguity_flag: conflicting || dangling_pronoun,
            keywords,
        }
    }
}

/// Where parties and pronouns are mentioned in one clause.
struct SubjectIndex {
    /// Byte offsets of party mentions
    mentions: Vec<usize>,
    /// Byte offsets of personal pronouns
    pronouns: Vec<usize>,
}

impl SubjectIndex {
    fn new(text: &str, parties: &[Party]) -> Self {
        let lower = text.to_ascii_lowercase();
        let mut mentions = Vec::new();
        let mut pronouns = Vec::new();

        for (start, word) in word_indices(&lower) {
            if PERSONAL_PRONOUNS.contains(&word) {
                pronouns.push(start);
            } else if GENERIC_SUBJECTS.contains(&word) {
                mentions.push(start);
            }
        }

        let named = parties.iter().flat_map(|p| p.mentions());
        let nouns = ROLE_NOUNS.iter().map(|n| n.to_ascii_lowercase());
        for needle in named.chain(nouns) {
            mentions.extend(whole_word_matches(&lower, &needle));
        }

        Self { mentions, pronouns }
    }

    fn mentioned_before(&self, offset: usize) -> bool {
        self.mentions.iter().any(|&m| m < offset)
    }
}

fn whole_word_matches(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(needle)
        .filter(|(start, _)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + needle.len()..].chars().next();
            let boundary = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
            // plural role nouns ("employees") still count
            boundary(before) && (boundary(after) || after == Some('s'))
        })
        .map(|(start, _)| start)
        .collect()
}
