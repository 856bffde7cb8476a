//! Obligation, right and prohibition text.
//!
//! Every modal keyword opens a provision that runs to the next modal keyword
//! or the end of the clause. "The Vendor shall deliver the goods and may
//! invoice monthly" yields an obligation ("deliver the goods") and a right
//! ("invoice monthly").

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{ContractKeywordResolver, ModalKind};

/// Deontic kind of a provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionKind {
    Obligation,
    Right,
    Prohibition,
}

impl From<ModalKind> for ProvisionKind {
    fn from(kind: ModalKind) -> Self {
        match kind {
            ModalKind::Duty => ProvisionKind::Obligation,
            ModalKind::Permission => ProvisionKind::Right,
            ModalKind::Prohibition => ProvisionKind::Prohibition,
        }
    }
}

/// What a party must, may or must not do, as written after the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub clause_index: usize,
    pub kind: ProvisionKind,
    pub text: String,
    /// Byte range of `text` within the clause
    pub span: Range<usize>,
}

const TRAILING_CONJUNCTIONS: [&str; 3] = ["and", "or", "but"];

#[derive(Default)]
pub struct ProvisionResolver {
    keywords: ContractKeywordResolver,
}

impl ProvisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, clause_index: usize, text: &str) -> Vec<Provision> {
        let modals: Vec<(ModalKind, Range<usize>)> = self
            .keywords
            .find(text)
            .into_iter()
            .filter_map(|k| k.keyword.modal_kind().map(|kind| (kind, k.span)))
            .collect();

        let mut provisions = Vec::new();
        for (i, (kind, span)) in modals.iter().enumerate() {
            let end = modals.get(i + 1).map_or(text.len(), |(_, next)| next.start);
            let Some(range) = provision_range(text, span.end..end) else {
                continue;
            };
            provisions.push(Provision {
                clause_index,
                kind: (*kind).into(),
                text: text[range.clone()].to_string(),
                span: range,
            });
        }

        provisions
    }
}

/// Trim whitespace, closing punctuation and a dangling conjunction.
fn provision_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let is_trim = |c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':');
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start_matches(is_trim).len());
    let mut end = range.end - (slice.len() - slice.trim_end_matches(is_trim).len());

    if start >= end {
        return None;
    }
    let body = &text[start..end];
    if let Some((head, last)) = body.rsplit_once(char::is_whitespace) {
        if TRAILING_CONJUNCTIONS.contains(&last.to_ascii_lowercase().as_str()) {
            end = start + head.trim_end_matches(is_trim).len();
        }
    }

    (start < end).then(|| start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisions(text: &str) -> Vec<(ProvisionKind, String)> {
        ProvisionResolver::new()
            .find(0, text)
            .into_iter()
            .map(|p| (p.kind, p.text))
            .collect()
    }

    #[test]
    fn each_modal_opens_a_provision() {
        assert_eq!(
            provisions("The Vendor shall deliver the goods and may invoice monthly."),
            vec![
                (ProvisionKind::Obligation, "deliver the goods".to_string()),
                (ProvisionKind::Right, "invoice monthly".to_string()),
            ]
        );
    }

    #[test]
    fn negated_modals_are_prohibitions() {
        assert_eq!(
            provisions("The Employee shall not disclose Confidential Information."),
            vec![(
                ProvisionKind::Prohibition,
                "disclose Confidential Information".to_string()
            )]
        );
        assert_eq!(
            provisions("The Tenant is prohibited from subletting the premises."),
            vec![(ProvisionKind::Prohibition, "subletting the premises".to_string())]
        );
    }

    #[test]
    fn span_points_into_clause() {
        let text = "The Client is entitled to audit the accounts.";
        let found = ProvisionResolver::new().find(3, text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].clause_index, 3);
        assert_eq!(found[0].kind, ProvisionKind::Right);
        assert_eq!(&text[found[0].span.clone()], "audit the accounts");
    }

    #[test]
    fn no_modal_no_provision() {
        assert!(provisions("This agreement is governed by the laws of India.").is_empty());
    }
}
