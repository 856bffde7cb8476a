//! Contract keyword detection.
//!
//! Identifies the modal keywords that signal:
//! - Duties (shall, must, is required to)
//! - Permissions (may, can, is entitled to)
//! - Prohibitions (shall not, cannot, is prohibited from)
//! - Definitions (means, hereinafter)
//!
//! A modal followed by "not" is upgraded to its prohibition form, except
//! "shall not be required to" which grants discretion.

use std::ops::Range;

use crate::utils::word_indices;

/// Contract-specific keywords that carry semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKeyword {
    // Duties
    /// "shall" - indicates a duty/obligation
    Shall,
    /// "must" - indicates a duty/obligation
    Must,
    /// "will" - indicates future commitment/duty
    Will,
    /// "is required to", "shall be required to"
    RequiredTo,

    // Permissions
    /// "may" - indicates permission
    May,
    /// "can" - indicates permission
    Can,
    /// "is entitled to", "shall be entitled to"
    EntitledTo,
    /// "is permitted to", "is allowed to"
    Permitted,
    /// "shall not be required to" - discretion
    NotRequiredTo,

    // Prohibitions
    /// "shall not"
    ShallNot,
    /// "must not"
    MustNot,
    /// "may not"
    MayNot,
    /// "will not" / "won't"
    WillNot,
    /// "cannot" / "can not" / "can't"
    Cannot,
    /// "is prohibited from", "is not permitted to"
    Prohibited,

    // Definition signals
    /// "means", "shall mean", "refers to"
    Means,
    /// "hereinafter", "hereafter"
    Hereinafter,
}

/// Deontic force of a modal keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Duty,
    Permission,
    Prohibition,
}

impl ContractKeyword {
    /// The deontic force of this keyword, or `None` for definition signals.
    pub fn modal_kind(self) -> Option<ModalKind> {
        use ContractKeyword::*;
        match self {
            Shall | Must | Will | RequiredTo => Some(ModalKind::Duty),
            May | Can | EntitledTo | Permitted | NotRequiredTo => Some(ModalKind::Permission),
            ShallNot | MustNot | MayNot | WillNot | Cannot | Prohibited => {
                Some(ModalKind::Prohibition)
            }
            Means | Hereinafter => None,
        }
    }
}

/// A keyword and the byte range it covers in the clause text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub keyword: ContractKeyword,
    pub span: Range<usize>,
}

/// Configuration for contract keyword detection.
pub struct ContractKeywordResolver {
    /// Modals that map to a duty when not negated
    duty_modals: Vec<&'static str>,
    /// Modals that map to a permission when not negated
    permission_modals: Vec<&'static str>,
    /// Single-token negated contractions
    contractions: Vec<(&'static str, ContractKeyword)>,
    /// Keywords that map to Means
    means_keywords: Vec<&'static str>,
    /// Keywords that map to Hereinafter
    hereinafter_keywords: Vec<&'static str>,
}

impl Default for ContractKeywordResolver {
    fn default() -> Self {
        Self {
            duty_modals: vec!["shall", "must", "will"],
            permission_modals: vec!["may", "can"],
            contractions: vec![
                ("cannot", ContractKeyword::Cannot),
                ("can't", ContractKeyword::Cannot),
                ("won't", ContractKeyword::WillNot),
                ("shan't", ContractKeyword::ShallNot),
                ("mustn't", ContractKeyword::MustNot),
            ],
            means_keywords: vec!["means", "mean"],
            hereinafter_keywords: vec!["hereinafter", "hereafter"],
        }
    }
}

impl ContractKeywordResolver {
    /// Create a new resolver with default keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// All keywords in `text`, in order, without overlaps.
    pub fn find(&self, text: &str) -> Vec<KeywordMatch> {
        // (start, end, normalized word)
        let tokens: Vec<(usize, usize, String)> = word_indices(text)
            .into_iter()
            .map(|(start, w)| (start, start + w.len(), w.to_lowercase().replace('’', "'")))
            .collect();
        let word = |i: usize| tokens.get(i).map(|(_, _, w)| w.as_str());

        let mut matches = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let Some((keyword, last)) = self.match_at(&word, i) else {
                i += 1;
                continue;
            };
            matches.push(KeywordMatch {
                keyword,
                span: tokens[i].0..tokens[last].1,
            });
            i = last + 1;
        }

        matches
    }

    /// Match a keyword starting at token `i`, returning it with the index of its last token.
    fn match_at<'a>(
        &self,
        word: &impl Fn(usize) -> Option<&'a str>,
        i: usize,
    ) -> Option<(ContractKeyword, usize)> {
        use ContractKeyword::*;
        let current = word(i)?;
        let next = word(i + 1);
        let prev_is_not = i > 0 && word(i - 1) == Some("not");

        if let Some((_, keyword)) = self.contractions.iter().find(|(w, _)| *w == current) {
            return Some((*keyword, i));
        }

        let is_numeric = |w: Option<&str>| w.map_or(false, |w| w.chars().all(|c| c.is_ascii_digit()));
        // "15 May 2024"
        if current == "may" && (is_numeric(next) || (i > 0 && is_numeric(word(i - 1)))) {
            return None;
        }

        if self.duty_modals.contains(&current) || self.permission_modals.contains(&current) {
            // "shall be required to" / "shall be entitled to" / "shall be prohibited from"
            if next == Some("be") {
                if let Some(found) = self.match_participle(word, i + 2, false) {
                    return Some(found);
                }
            }
            if next == Some("not") {
                // "shall not be required to" grants discretion
                if word(i + 2) == Some("be")
                    && word(i + 3) == Some("required")
                    && word(i + 4) == Some("to")
                {
                    return Some((NotRequiredTo, i + 4));
                }
                let negated = match current {
                    "shall" => ShallNot,
                    "must" => MustNot,
                    "will" => WillNot,
                    "may" => MayNot,
                    _ => Cannot,
                };
                return Some((negated, i + 1));
            }
            if current == "shall" && matches!(next, Some("mean") | Some("means")) {
                return Some((Means, i + 1));
            }
            let plain = match current {
                "shall" => Shall,
                "must" => Must,
                "will" => Will,
                "may" => May,
                _ => Can,
            };
            return Some((plain, i));
        }

        if let Some(found) = self.match_participle(word, i, prev_is_not) {
            return Some(found);
        }

        if self.means_keywords.contains(&current)
            || (current == "refers" && next == Some("to"))
        {
            return Some((Means, i));
        }
        if self.hereinafter_keywords.contains(&current) {
            return Some((Hereinafter, i));
        }

        None
    }

    /// "required to", "entitled to", "permitted to", "prohibited from" at token `i`.
    fn match_participle<'a>(
        &self,
        word: &impl Fn(usize) -> Option<&'a str>,
        i: usize,
        negated: bool,
    ) -> Option<(ContractKeyword, usize)> {
        use ContractKeyword::*;
        let keyword = match (word(i)?, word(i + 1)?) {
            ("required" | "obliged" | "obligated", "to") if negated => NotRequiredTo,
            ("required" | "obliged" | "obligated", "to") => RequiredTo,
            ("entitled", "to") => EntitledTo,
            ("permitted" | "allowed", "to") if negated => Prohibited,
            ("permitted" | "allowed", "to") => Permitted,
            ("prohibited" | "forbidden" | "barred" | "restricted", "from") => Prohibited,
            _ => return None,
        };
        Some((keyword, i + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(text: &str) -> Vec<ContractKeyword> {
        ContractKeywordResolver::new()
            .find(text)
            .into_iter()
            .map(|m| m.keyword)
            .collect()
    }

    #[test]
    fn duties_permissions_prohibitions() {
        use ContractKeyword::*;
        assert_eq!(keywords("The Tenant shall pay rent."), vec![Shall]);
        assert_eq!(keywords("The Tenant may sublet."), vec![May]);
        assert_eq!(keywords("The Tenant shall not sublet."), vec![ShallNot]);
        assert_eq!(keywords("The Buyer is required to pay."), vec![RequiredTo]);
        assert_eq!(keywords("The Buyer is entitled to a refund."), vec![EntitledTo]);
        assert_eq!(keywords("The Buyer is prohibited from reselling."), vec![Prohibited]);
        assert_eq!(keywords("The Buyer is not permitted to resell."), vec![Prohibited]);
        assert_eq!(keywords("The Buyer cannot resell."), vec![Cannot]);
        assert_eq!(keywords("The Buyer can't resell."), vec![Cannot]);
        assert_eq!(keywords("The Buyer won’t resell."), vec![WillNot]);
    }

    #[test]
    fn shall_not_be_required_to_is_discretion() {
        assert_eq!(
            keywords("The Company shall not be required to refund fees."),
            vec![ContractKeyword::NotRequiredTo]
        );
        assert_eq!(
            ContractKeyword::NotRequiredTo.modal_kind(),
            Some(ModalKind::Permission)
        );
    }

    #[test]
    fn shall_be_participles() {
        use ContractKeyword::*;
        assert_eq!(keywords("The Employee shall be entitled to leave."), vec![EntitledTo]);
        assert_eq!(keywords("The Employee shall be required to attend."), vec![RequiredTo]);
    }

    #[test]
    fn definitions() {
        use ContractKeyword::*;
        assert_eq!(keywords("\"Services\" means the work."), vec![Means]);
        assert_eq!(keywords("\"Fees\" shall mean the amounts."), vec![Means]);
        assert_eq!(
            keywords("ABC Ltd (hereinafter referred to as the \"Vendor\")"),
            vec![Hereinafter]
        );
    }

    #[test]
    fn spans_cover_keyword_text() {
        let text = "Employee shall not compete.";
        let found = ContractKeywordResolver::new().find(text);
        assert_eq!(&text[found[0].span.clone()], "shall not");
    }
}
