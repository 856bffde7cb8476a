//! Clause topic classification.
//!
//! Each topic has a list of cue patterns. Every cue occurrence in the clause
//! counts once; the topic with the most occurrences wins, ties going to the
//! earlier topic in [`ClauseTopic::ORDER`]. A clause with no cue is
//! [`ClauseTopic::General`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::hindi::normalize_hindi_terms;

/// Subject matter of a clause, independent of its modal role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseTopic {
    Termination,
    Payment,
    Liability,
    Confidentiality,
    IntellectualProperty,
    NonCompete,
    General,
}

impl ClauseTopic {
    /// Tie-break order: earlier wins.
    pub const ORDER: [ClauseTopic; 6] = [
        ClauseTopic::Termination,
        ClauseTopic::Payment,
        ClauseTopic::Liability,
        ClauseTopic::Confidentiality,
        ClauseTopic::IntellectualProperty,
        ClauseTopic::NonCompete,
    ];
}

impl fmt::Display for ClauseTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseTopic::Termination => "termination",
            ClauseTopic::Payment => "payment",
            ClauseTopic::Liability => "liability",
            ClauseTopic::Confidentiality => "confidentiality",
            ClauseTopic::IntellectualProperty => "intellectual property",
            ClauseTopic::NonCompete => "non-compete",
            ClauseTopic::General => "general",
        };
        f.write_str(name)
    }
}

fn cues(topic: ClauseTopic) -> &'static [&'static str] {
    match topic {
        ClauseTopic::Termination => &[
            r"\bterminat(?:e|es|ed|ion)\b",
            r"\bend\s+(?:of\s+)?(?:this\s+)?agreement\b",
            r"\bexpir(?:y|ation|es)\b",
            r"\bdissolution\b",
        ],
        ClauseTopic::Payment => &[
            r"\bpay(?:able|ments?)?\b",
            r"\bsalary\b",
            r"\bcompensation\b",
            r"\bremuneration\b",
            r"\bfees?\b",
            r"\bamounts?\b",
            r"\bconsideration\b",
        ],
        ClauseTopic::Liability => &[
            r"\bliabilit(?:y|ies)\b",
            r"\bliable\b",
            r"\bresponsible\b",
            r"\bdamages\b",
            r"\bindemni(?:ty|fy|fication)\b",
            r"\bloss(?:es)?\b",
        ],
        ClauseTopic::Confidentiality => &[
            r"\bconfidential(?:ity)?\b",
            r"\bproprietary\b",
            r"\btrade\s+secrets?\b",
            r"\bnon[\s\-]?disclosure\b",
            r"\bsecrecy\b",
        ],
        ClauseTopic::IntellectualProperty => &[
            r"\bintellectual\s+property\b",
            r"\bcopyrights?\b",
            r"\btrade\s?marks?\b",
            r"\bpatents?\b",
            r"\bip\s+rights\b",
        ],
        ClauseTopic::NonCompete => &[
            r"\bnon[\s\-]?compete\b",
            r"\brestraint\s+of\s+trade\b",
            r"\bcompet(?:e|ing|ition)\b",
            r"\bcompeting\s+(?:business|activit(?:y|ies))\b",
            r"\bsolicit\b[^.;]*\b(?:employees?|clients?|customers?)\b",
        ],
        ClauseTopic::General => &[],
    }
}

#[allow(clippy::unwrap_used)] // Built from constant cue patterns
static TOPIC_CUES: Lazy<Vec<(ClauseTopic, Regex)>> = Lazy::new(|| {
    ClauseTopic::ORDER
        .iter()
        .flat_map(|topic| {
            cues(*topic)
                .iter()
                .map(move |cue| (*topic, Regex::new(&format!("(?i){cue}")).unwrap()))
        })
        .collect()
});

#[derive(Debug, Default)]
pub struct ClauseTopicResolver;

impl ClauseTopicResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> ClauseTopic {
        let text = normalize_hindi_terms(text);

        let mut best = (ClauseTopic::General, 0);
        for topic in ClauseTopic::ORDER {
            let hits: usize = TOPIC_CUES
                .iter()
                .filter(|(t, _)| *t == topic)
                .map(|(_, regex)| regex.find_iter(&text).count())
                .sum();
            if hits > best.1 {
                best = (topic, hits);
            }
        }

        best.0
    }
}
