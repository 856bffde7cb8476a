//! Parser for `.contract` fixture files.
//!
//! ```text
//! # Title
//! «E:The Employee» shall pay a «1:penalty» of ₹100,000 for breach.
//! ---
//! The Employer may terminate this agreement at any time.
//! > [1]: Finding(category=penalty, severity=High)
//! > §E: Party(role=employee)
//! > [*]: Document(contract_type=employment, score>=60)
//! ```

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{
    Assertion, AssertionBody, CompareOp, ContractFixture, EntityDef, FieldCheck, MarkerId,
    Paragraph, RefTarget, SpanMarker,
};

/// Parse span markers from text, returning spans, entities, and normalized text.
///
/// Input text may contain «ID:text» markers. Ranges are byte ranges in the
/// normalized (marker-free) text; named markers also define entities.
pub fn parse_spans(
    input: &str,
    paragraph_idx: usize,
) -> SpecResult<(String, Vec<SpanMarker>, Vec<EntityDef>)> {
    let mut spans = Vec::new();
    let mut entities = Vec::new();
    let mut normalized = String::new();
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        if ch != '«' {
            normalized.push(ch);
            continue;
        }

        let start_normalized = normalized.len();

        let mut id_str = String::new();
        loop {
            match chars.next() {
                Some((_, ':')) => break,
                Some((_, c)) if c.is_alphanumeric() || c == '_' => id_str.push(c),
                Some((_, c)) => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: format!(
                            "Invalid span marker: expected alphanumeric or ':', found '{}'",
                            c
                        ),
                    });
                }
                None => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Unclosed span marker: expected ':'".to_string(),
                    });
                }
            }
        }

        if id_str.is_empty() {
            return Err(SpecError::Parse {
                line: count_lines(input, pos),
                message: "Empty span marker ID".to_string(),
            });
        }

        let marker_id = if id_str.chars().all(|c| c.is_ascii_digit()) {
            let id: usize = id_str.parse().map_err(|_| SpecError::Parse {
                line: count_lines(input, pos),
                message: format!("Invalid span ID: '{}'", id_str),
            })?;
            MarkerId::Numeric(id)
        } else {
            MarkerId::Named(id_str)
        };

        let mut text = String::new();
        loop {
            match chars.next() {
                Some((_, '»')) => break,
                Some((_, c)) => {
                    text.push(c);
                    normalized.push(c);
                }
                None => {
                    return Err(SpecError::Parse {
                        line: count_lines(input, pos),
                        message: "Unclosed span marker: expected '»'".to_string(),
                    });
                }
            }
        }

        let char_range = start_normalized..normalized.len();

        if let MarkerId::Named(name) = &marker_id {
            entities.push(EntityDef {
                id: name.clone(),
                text: text.clone(),
                paragraph_idx,
                char_range: char_range.clone(),
            });
        }

        spans.push(SpanMarker {
            id: marker_id,
            text,
            char_range,
        });
    }

    Ok((normalized, spans, entities))
}

/// Count lines up to a byte position (for error messages).
fn count_lines(input: &str, byte_pos: usize) -> usize {
    input[..byte_pos.min(input.len())]
        .chars()
        .filter(|&c| c == '\n')
        .count()
        + 1
}

/// Parse a full `.contract` fixture file.
pub fn parse_fixture(input: &str) -> SpecResult<ContractFixture> {
    let mut title = None;
    let mut paragraph_lines: Vec<Vec<&str>> = vec![Vec::new()];
    let mut assertion_lines = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let trimmed = line.trim();

        if title.is_none() && trimmed.starts_with("# ") {
            title = Some(trimmed[2..].trim().to_string());
        } else if trimmed == "---" {
            paragraph_lines.push(Vec::new());
        } else if let Some(assertion) = trimmed.strip_prefix("> ") {
            assertion_lines.push((line_num + 1, assertion.trim()));
        } else if !trimmed.is_empty() && !trimmed.starts_with("//") {
            if let Some(last) = paragraph_lines.last_mut() {
                last.push(line.trim_end());
            }
        }
    }

    let mut paragraphs = Vec::new();
    let mut all_entities = Vec::new();

    for (idx, lines) in paragraph_lines.into_iter().enumerate() {
        if lines.is_empty() {
            continue;
        }

        let content = lines.join("\n");
        let (text, spans, entities) = parse_spans(&content, idx)?;

        paragraphs.push(Paragraph {
            index: idx,
            text,
            spans,
        });
        all_entities.extend(entities);
    }

    let mut assertions = Vec::new();
    for (line_num, assertion_text) in assertion_lines {
        assertions.push(parse_assertion(assertion_text, line_num)?);
    }

    Ok(ContractFixture {
        title,
        paragraphs,
        entities: all_entities,
        assertions,
    })
}

/// Parse a single assertion line: `[n]: Type(body)`, `§Entity: Type(body)`
/// or `[*]: Type(body)`.
fn parse_assertion(input: &str, source_line: usize) -> SpecResult<Assertion> {
    let input = input.trim();

    let (target, rest) = if let Some(after_section) = input.strip_prefix('§') {
        let colon_pos = after_section.find(':').ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Expected ':' after entity reference: {}", input),
        })?;
        let entity_id = after_section[..colon_pos].trim().to_string();
        (RefTarget::Entity(entity_id), &after_section[colon_pos + 1..])
    } else if input.starts_with('[') {
        let bracket_end = input.find(']').ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Unclosed bracket in assertion: {}", input),
        })?;

        let target = parse_ref_target(&input[1..bracket_end], source_line)?;

        let rest = input[bracket_end + 1..].trim_start();
        let rest = rest.strip_prefix(':').ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Expected ':' after reference: {}", input),
        })?;
        (target, rest)
    } else {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Assertion must start with '[' or '§': {}", input),
        });
    };

    let type_and_body = rest.trim();

    let paren_start = type_and_body.find('(').ok_or_else(|| SpecError::Parse {
        line: source_line,
        message: format!("Expected Type(body) format: {}", type_and_body),
    })?;

    let span_type = type_and_body[..paren_start].trim().to_string();

    if !type_and_body.ends_with(')') {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Unclosed parenthesis: {}", type_and_body),
        });
    }

    let body_str = &type_and_body[paren_start + 1..type_and_body.len() - 1];
    let body = parse_assertion_body(body_str, source_line)?;

    Ok(Assertion {
        target,
        span_type,
        body,
        source_line,
    })
}

/// Parse reference target: numeric ID, text reference, or `*`.
fn parse_ref_target(input: &str, source_line: usize) -> SpecResult<RefTarget> {
    let input = input.trim();

    if input == "*" {
        return Ok(RefTarget::Document);
    }

    if let Some(quoted) = input.strip_prefix('"') {
        let end_quote = quoted.find('"').ok_or_else(|| SpecError::Parse {
            line: source_line,
            message: format!("Unclosed quote in text reference: {}", input),
        })?;

        let text = quoted[..end_quote].to_string();
        let rest = &quoted[end_quote + 1..];

        let occurrence = match rest.strip_prefix('@') {
            Some(n) => n.parse().map_err(|_| SpecError::Parse {
                line: source_line,
                message: format!("Invalid occurrence index in '{}': expected number", input),
            })?,
            None => 0,
        };

        return Ok(RefTarget::TextRef { text, occurrence });
    }

    let id: usize = input.parse().map_err(|_| SpecError::Parse {
        line: source_line,
        message: format!("Invalid span reference '{}': expected number", input),
    })?;
    Ok(RefTarget::Span(id))
}

/// Parse assertion body: comma-separated field checks.
fn parse_assertion_body(input: &str, source_line: usize) -> SpecResult<AssertionBody> {
    let mut field_checks = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        field_checks.push(parse_field_check(part, source_line)?);
    }

    Ok(AssertionBody { field_checks })
}

/// Parse a single field check: field=value, field>=value, etc.
fn parse_field_check(input: &str, source_line: usize) -> SpecResult<FieldCheck> {
    let (field, operator, expected) = if let Some(pos) = input.find(">=") {
        (&input[..pos], CompareOp::Gte, &input[pos + 2..])
    } else if let Some(pos) = input.find("<=") {
        (&input[..pos], CompareOp::Lte, &input[pos + 2..])
    } else if let Some(pos) = input.find("~=") {
        (&input[..pos], CompareOp::Contains, &input[pos + 2..])
    } else if let Some(pos) = input.find('=') {
        (&input[..pos], CompareOp::Equals, &input[pos + 1..])
    } else {
        return Err(SpecError::Parse {
            line: source_line,
            message: format!("Invalid field check '{}': expected 'field=value'", input),
        });
    };

    Ok(FieldCheck {
        field: field.trim().to_string(),
        expected: expected.trim().to_string(),
        operator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_span() {
        let (normalized, spans, entities) =
            parse_spans("Pay a «1:penalty» of ₹5,000.", 0).unwrap();
        assert_eq!(normalized, "Pay a penalty of ₹5,000.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].id, MarkerId::Numeric(1));
        assert_eq!(spans[0].text, "penalty");
        assert_eq!(spans[0].char_range, 6..13);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_span_ranges_are_byte_ranges() {
        let (normalized, spans, _) = parse_spans("Pay «1:₹5,000» now.", 0).unwrap();
        assert_eq!(&normalized[spans[0].char_range.clone()], "₹5,000");
    }

    #[test]
    fn test_parse_named_span() {
        let (normalized, spans, entities) =
            parse_spans("«E:The Employee» shall not compete.", 0).unwrap();
        assert_eq!(normalized, "The Employee shall not compete.");
        assert_eq!(spans[0].id, MarkerId::Named("E".to_string()));
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "E");
        assert_eq!(entities[0].text, "The Employee");
    }

    #[test]
    fn test_unclosed_marker_is_an_error() {
        let err = parse_spans("Pay a «1:penalty", 0).unwrap_err();
        assert!(err.to_string().contains("expected '»'"));
        assert!(parse_spans("«:text»", 0).is_err());
    }

    #[test]
    fn test_parse_assertion() {
        let assertion = parse_assertion("[1]: Finding(category=penalty, severity=High)", 4).unwrap();
        assert_eq!(assertion.target, RefTarget::Span(1));
        assert_eq!(assertion.span_type, "Finding");
        assert_eq!(assertion.body.field_checks.len(), 2);
        assert_eq!(assertion.body.field_checks[1].field, "severity");
        assert_eq!(assertion.body.field_checks[1].expected, "High");
        assert_eq!(assertion.source_line, 4);
    }

    #[test]
    fn test_parse_document_assertion() {
        let assertion = parse_assertion("[*]: Document(score>=60, score<=70)", 1).unwrap();
        assert_eq!(assertion.target, RefTarget::Document);
        assert_eq!(assertion.body.field_checks[0].operator, CompareOp::Gte);
        assert_eq!(assertion.body.field_checks[1].operator, CompareOp::Lte);
    }

    #[test]
    fn test_parse_entity_and_text_ref() {
        let assertion = parse_assertion("§E: Party(role=employee)", 1).unwrap();
        assert_eq!(assertion.target, RefTarget::Entity("E".to_string()));

        let assertion = parse_assertion("[\"penalty\"@1]: NoFinding(category=penalty)", 1).unwrap();
        assert_eq!(
            assertion.target,
            RefTarget::TextRef {
                text: "penalty".to_string(),
                occurrence: 1
            }
        );
    }

    #[test]
    fn test_parse_assertion_errors() {
        assert!(parse_assertion("1: Finding()", 1).is_err());
        assert!(parse_assertion("[1] Finding()", 1).is_err());
        assert!(parse_assertion("[1]: Finding", 1).is_err());
        assert!(parse_assertion("[x]: Finding()", 1).is_err());
        assert!(parse_assertion("[1]: Finding(severity)", 1).is_err());
    }

    #[test]
    fn test_parse_fixture() {
        let input = "# Penalty\n\
                     // amounts are required\n\
                     The Supplier shall pay a «1:penalty» of ₹5,000.\n\
                     ---\n\
                     Any dispute shall go to arbitration.\n\
                     > [1]: Finding(category=penalty)\n\
                     > [*]: Document(clauses=2)\n";
        let fixture = parse_fixture(input).unwrap();
        assert_eq!(fixture.title.as_deref(), Some("Penalty"));
        assert_eq!(fixture.paragraphs.len(), 2);
        assert_eq!(fixture.assertions.len(), 2);
        assert_eq!(fixture.assertions[0].source_line, 6);
        assert_eq!(
            fixture.normalized_text(),
            "The Supplier shall pay a penalty of ₹5,000.\n\nAny dispute shall go to arbitration."
        );
    }
}
