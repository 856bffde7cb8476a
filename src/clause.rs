use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{ClauseTopic, ListMarker};

/// Grammatical role of a clause, decided by its modal cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseRole {
    Obligation,
    Right,
    Restriction,
    Definition,
    Unclassified,
}

impl std::fmt::Display for ClauseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClauseRole::Obligation => "obligation",
            ClauseRole::Right => "right",
            ClauseRole::Restriction => "restriction",
            ClauseRole::Definition => "definition",
            ClauseRole::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// One independently analyzable unit of contract text.
///
/// Produced by the segmenter with no role or topic; the extractor returns
/// annotated copies via [`Clause::annotated`]. A clause is never mutated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    index: usize,
    text: String,
    offset: usize,
    heading: Option<ListMarker>,
    role: Option<ClauseRole>,
    topic: Option<ClauseTopic>,
    ambiguity_flag: bool,
}

impl Clause {
    pub(crate) fn new(index: usize, text: &str, offset: usize, heading: Option<ListMarker>) -> Self {
        Self {
            index,
            text: text.to_string(),
            offset,
            heading,
            role: None,
            topic: None,
            ambiguity_flag: false,
        }
    }

    /// Position in the document, zero-based and contiguous.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Verbatim (trimmed) substring of the document.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the clause within the document.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte range of the clause within the document.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.text.len()
    }

    pub fn heading(&self) -> Option<&ListMarker> {
        self.heading.as_ref()
    }

    /// `None` until the extractor has run.
    pub fn role(&self) -> Option<ClauseRole> {
        self.role
    }

    /// `None` until the extractor has run.
    pub fn topic(&self) -> Option<ClauseTopic> {
        self.topic
    }

    pub fn ambiguity_flag(&self) -> bool {
        self.ambiguity_flag
    }

    /// A copy of this clause carrying a role, topic and ambiguity flag.
    pub fn annotated(&self, role: ClauseRole, topic: ClauseTopic, ambiguity_flag: bool) -> Clause {
        Clause {
            role: Some(role),
            topic: Some(topic),
            ambiguity_flag,
            ..self.clone()
        }
    }
}
