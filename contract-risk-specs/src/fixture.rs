//! Core types for parsed `.contract` fixture files.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A parsed `.contract` fixture document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractFixture {
    /// Optional title from `# Title` header
    pub title: Option<String>,
    /// Paragraphs separated by `---`
    pub paragraphs: Vec<Paragraph>,
    /// Document-wide entity registry (from «ID:text» markers)
    pub entities: Vec<EntityDef>,
    pub assertions: Vec<Assertion>,
}

/// A single paragraph within the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub index: usize,
    /// The normalized text (markers removed)
    pub text: String,
    pub spans: Vec<SpanMarker>,
}

/// An entity definition from «ID:text» syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    /// The entity ID (e.g., "E" from «E:the Employee»)
    pub id: String,
    pub text: String,
    pub paragraph_idx: usize,
    /// Byte range in the paragraph's normalized text
    pub char_range: Range<usize>,
}

/// A span marker extracted from «ID:text» syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanMarker {
    pub id: MarkerId,
    /// The marked text content (without guillemets)
    pub text: String,
    /// Byte range in the paragraph's normalized text
    pub char_range: Range<usize>,
}

/// Marker ID can be numeric or named.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MarkerId {
    /// Numeric ID from «1:text»
    Numeric(usize),
    /// Named ID from «E:text» (creates entity)
    Named(String),
}

/// An assertion about a span, an entity or the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    pub target: RefTarget,
    /// The asserted kind (e.g., "Finding", "Clause", "Document")
    pub span_type: String,
    pub body: AssertionBody,
    /// Source line number for error reporting
    pub source_line: usize,
}

/// What an assertion refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RefTarget {
    /// Reference to a numbered span: [1], [2], etc.
    Span(usize),
    /// Reference to a named entity: §E, §Vendor
    Entity(String),
    /// Reference by text content with optional occurrence index: ["text"], ["text"@2]
    TextRef {
        text: String,
        /// 0-indexed occurrence (default 0)
        occurrence: usize,
    },
    /// The whole document: [*]
    Document,
}

/// Parsed assertion body containing field assertions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssertionBody {
    pub field_checks: Vec<FieldCheck>,
}

/// A single field check within an assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCheck {
    /// Field name (e.g., "category")
    pub field: String,
    /// Expected value (e.g., "penalty")
    pub expected: String,
    pub operator: CompareOp,
}

/// Comparison operators for field checks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompareOp {
    /// Exact equality: field=value
    #[default]
    Equals,
    /// Greater than or equal: field>=value
    Gte,
    /// Less than or equal: field<=value
    Lte,
    /// Contains: field~=value (for string matching)
    Contains,
}

impl ContractFixture {
    /// The document handed to the analyzer: paragraphs joined by a blank line.
    pub fn normalized_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Byte offset of a paragraph within [`normalized_text`](Self::normalized_text).
    pub fn paragraph_offset(&self, paragraph_idx: usize) -> Option<usize> {
        let mut offset = 0;
        for para in &self.paragraphs {
            if para.index == paragraph_idx {
                return Some(offset);
            }
            offset += para.text.len() + 2;
        }
        None
    }

    pub fn spans(&self) -> Vec<&SpanMarker> {
        self.paragraphs.iter().flat_map(|p| &p.spans).collect()
    }

    pub fn entity_by_id(&self, id: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Find span by numeric ID in any paragraph.
    pub fn span_by_numeric_id(&self, id: usize) -> Option<(&Paragraph, &SpanMarker)> {
        for para in &self.paragraphs {
            for span in &para.spans {
                if span.id == MarkerId::Numeric(id) {
                    return Some((para, span));
                }
            }
        }
        None
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerId::Numeric(n) => write!(f, "{}", n),
            MarkerId::Named(s) => write!(f, "{}", s),
        }
    }
}

impl std::fmt::Display for RefTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefTarget::Span(n) => write!(f, "[{}]", n),
            RefTarget::Entity(id) => write!(f, "§{}", id),
            RefTarget::TextRef { text, occurrence } => {
                if *occurrence == 0 {
                    write!(f, "[\"{}\"]", text)
                } else {
                    write!(f, "[\"{}\"@{}]", text, occurrence)
                }
            }
            RefTarget::Document => write!(f, "[*]"),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Equals => write!(f, "="),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Contains => write!(f, "~="),
        }
    }
}

impl std::fmt::Display for FieldCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator, self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(index: usize, text: &str) -> Paragraph {
        Paragraph {
            index,
            text: text.to_string(),
            spans: Vec::new(),
        }
    }

    #[test]
    fn paragraph_offsets_follow_the_joined_text() {
        let fixture = ContractFixture {
            title: None,
            paragraphs: vec![para(0, "First clause."), para(2, "Second clause.")],
            entities: Vec::new(),
            assertions: Vec::new(),
        };
        let text = fixture.normalized_text();
        let offset = fixture.paragraph_offset(2).unwrap();
        assert_eq!(&text[offset..], "Second clause.");
        assert_eq!(fixture.paragraph_offset(1), None);
    }

    #[test]
    fn ref_target_display() {
        assert_eq!(RefTarget::Span(3).to_string(), "[3]");
        assert_eq!(RefTarget::Entity("E".to_string()).to_string(), "§E");
        assert_eq!(RefTarget::Document.to_string(), "[*]");
        let text_ref = RefTarget::TextRef {
            text: "penalty".to_string(),
            occurrence: 1,
        };
        assert_eq!(text_ref.to_string(), "[\"penalty\"@1]");
    }
}
