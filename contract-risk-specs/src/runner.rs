//! Runs fixtures through the analyzer and checks their assertions.

use std::ops::Range;

use contract_risk::{Clause, RiskAnalyzer, RiskAssessment};
use serde::Serialize;

use crate::errors::SpecResult;
use crate::fixture::{Assertion, ContractFixture, RefTarget};
use crate::matcher::{
    check_absent, check_candidates, is_supported_type, unknown_fields, AssertionOutcome,
    AssertionResult, MatchResult, Observation,
};

/// Analyze a fixture's text and check all of its assertions.
pub fn run_fixture(
    analyzer: &RiskAnalyzer,
    fixture_name: &str,
    fixture: &ContractFixture,
) -> SpecResult<(RiskAssessment, MatchResult)> {
    let assessment = analyzer.analyze_text(&fixture.normalized_text())?;
    let result = check_fixture_assertions(fixture_name, fixture, &assessment);
    Ok((assessment, result))
}

/// Check a fixture's assertions against an existing assessment.
pub fn check_fixture_assertions(
    fixture_name: &str,
    fixture: &ContractFixture,
    assessment: &RiskAssessment,
) -> MatchResult {
    let text = fixture.normalized_text();
    let mut result = MatchResult::new(fixture_name);

    for assertion in &fixture.assertions {
        let (span_text, outcome) = match resolve_target(fixture, &text, &assertion.target) {
            Some(target) => {
                let outcome = check_assertion(assertion, &target, assessment);
                (target.text, outcome)
            }
            None => (
                String::new(),
                AssertionOutcome::NotFound {
                    reason: format!("target {} does not exist in the fixture", assertion.target),
                },
            ),
        };

        result.results.push(AssertionResult {
            assertion: assertion.clone(),
            span_text,
            outcome,
        });
    }

    result
}

/// A resolved assertion target: its text and byte range in the document.
struct Target {
    text: String,
    range: Range<usize>,
    whole_document: bool,
}

fn resolve_target(fixture: &ContractFixture, text: &str, target: &RefTarget) -> Option<Target> {
    let located = |paragraph_idx: usize, range: &Range<usize>, span_text: &str| {
        let offset = fixture.paragraph_offset(paragraph_idx)?;
        Some(Target {
            text: span_text.to_string(),
            range: offset + range.start..offset + range.end,
            whole_document: false,
        })
    };

    match target {
        RefTarget::Span(id) => {
            let (para, span) = fixture.span_by_numeric_id(*id)?;
            located(para.index, &span.char_range, &span.text)
        }
        RefTarget::Entity(id) => {
            let entity = fixture.entity_by_id(id)?;
            located(entity.paragraph_idx, &entity.char_range, &entity.text)
        }
        RefTarget::TextRef {
            text: needle,
            occurrence,
        } => {
            let (start, found) = text.match_indices(needle.as_str()).nth(*occurrence)?;
            Some(Target {
                text: found.to_string(),
                range: start..start + found.len(),
                whole_document: false,
            })
        }
        RefTarget::Document => Some(Target {
            text: String::new(),
            range: 0..text.len(),
            whole_document: true,
        }),
    }
}

fn check_assertion(
    assertion: &Assertion,
    target: &Target,
    assessment: &RiskAssessment,
) -> AssertionOutcome {
    let span_type = assertion.span_type.as_str();
    let checks = &assertion.body.field_checks;

    if !is_supported_type(span_type) {
        return AssertionOutcome::Unsupported {
            reason: format!("unknown assertion type `{}`", span_type),
        };
    }
    if (span_type == "Document") != target.whole_document {
        return AssertionOutcome::Unsupported {
            reason: "Document assertions take the [*] target and only those".to_string(),
        };
    }
    let unknown = unknown_fields(span_type, checks);
    if !unknown.is_empty() {
        return AssertionOutcome::Unsupported {
            reason: format!("unknown {} fields: {}", span_type, unknown.join(", ")),
        };
    }

    let candidates = observe(span_type, target, assessment);
    if span_type == "NoFinding" {
        check_absent(checks, &candidates)
    } else {
        check_candidates(span_type, checks, &candidates)
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Document range of a clause-relative span.
fn in_document(assessment: &RiskAssessment, clause_index: usize, span: &Range<usize>) -> Range<usize> {
    let offset = assessment.clause(clause_index).map_or(0, Clause::offset);
    offset + span.start..offset + span.end
}

/// Serialized name of a unit enum variant (`non_compete`, `High`, `INR`).
fn serde_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | ',' | '.'))
        .trim()
        .to_lowercase();
    ["the ", "a ", "an "]
        .iter()
        .find_map(|article| trimmed.strip_prefix(article))
        .map_or_else(|| trimmed.clone(), str::to_string)
}

fn observe(span_type: &str, target: &Target, assessment: &RiskAssessment) -> Vec<Observation> {
    let profile = &assessment.contract_profile;
    let hits = |clause_index: usize, span: &Range<usize>| {
        overlaps(&in_document(assessment, clause_index, span), &target.range)
    };

    match span_type {
        "Finding" | "NoFinding" => assessment
            .findings
            .iter()
            .zip(&assessment.finding_severities)
            .filter(|(f, _)| hits(f.clause_index, &f.matched_span))
            .map(|(f, severity)| {
                let adjusted_by: Vec<&str> = assessment
                    .adjustments
                    .iter()
                    .filter(|a| a.clause_index == f.clause_index && a.category == f.category)
                    .map(|a| a.rule.as_str())
                    .collect();
                vec![
                    ("category", serde_name(&f.category)),
                    ("severity", severity.to_string()),
                    ("base_severity", f.base_severity.to_string()),
                    ("text", f.matched_text.clone()),
                    ("clause", f.clause_index.to_string()),
                    ("adjusted_by", adjusted_by.join(",")),
                ]
            })
            .collect(),
        "Clause" => assessment
            .clauses
            .iter()
            .filter(|c| overlaps(&c.span(), &target.range))
            .map(|c| {
                vec![
                    ("index", c.index().to_string()),
                    ("role", c.role().map_or_else(|| "none".to_string(), |r| r.to_string())),
                    ("topic", c.topic().map_or_else(|| "none".to_string(), |t| serde_name(&t))),
                    (
                        "severity",
                        assessment
                            .clause_severity(c.index())
                            .map_or_else(|| "none".to_string(), |s| s.to_string()),
                    ),
                    ("ambiguous", c.ambiguity_flag().to_string()),
                    ("findings", assessment.findings_for(c.index()).count().to_string()),
                    ("text", c.text().to_string()),
                ]
            })
            .collect(),
        "Amount" => profile
            .monetary_amounts
            .iter()
            .filter(|a| hits(a.clause_index, &a.span))
            .map(|a| {
                vec![
                    ("value", a.value.to_string()),
                    ("currency", a.currency.code().to_string()),
                    ("text", a.text.clone()),
                    ("clause", a.clause_index.to_string()),
                ]
            })
            .collect(),
        "Duration" => profile
            .durations
            .iter()
            .filter(|d| hits(d.clause_index, &d.span))
            .map(|d| {
                vec![
                    ("value", d.value.to_string()),
                    ("unit", serde_name(&d.unit)),
                    ("days", format!("{}", d.to_approx_days().round())),
                    ("text", d.text.clone()),
                    ("clause", d.clause_index.to_string()),
                ]
            })
            .collect(),
        "Date" => profile
            .dates
            .iter()
            .filter(|d| hits(d.clause_index, &d.span))
            .map(|d| {
                vec![
                    ("iso", d.iso.map_or_else(|| "none".to_string(), |iso| iso.to_string())),
                    ("low_confidence", d.low_confidence.to_string()),
                    ("text", d.text.clone()),
                    ("clause", d.clause_index.to_string()),
                ]
            })
            .collect(),
        "Vague" => profile
            .vague_terms
            .iter()
            .filter(|v| hits(v.clause_index, &v.span))
            .map(|v| {
                vec![
                    ("phrase", v.phrase.clone()),
                    ("clause", v.clause_index.to_string()),
                ]
            })
            .collect(),
        "Provision" => profile
            .provisions
            .iter()
            .filter(|p| hits(p.clause_index, &p.span))
            .map(|p| {
                vec![
                    ("kind", serde_name(&p.kind)),
                    ("text", p.text.clone()),
                    ("clause", p.clause_index.to_string()),
                ]
            })
            .collect(),
        "Party" => {
            let wanted = normalize_name(&target.text);
            profile
                .parties
                .iter()
                .filter(|p| p.mentions().contains(&wanted))
                .map(|p| {
                    vec![
                        ("name", p.name.clone()),
                        ("role", p.role.map_or_else(|| "none".to_string(), |r| serde_name(&r))),
                        ("alias", p.alias.clone().unwrap_or_default()),
                    ]
                })
                .collect()
        }
        "Term" => {
            let wanted = normalize_name(&target.text);
            profile
                .defined_terms
                .iter()
                .filter(|t| normalize_name(&t.term_name) == wanted)
                .map(|t| {
                    vec![
                        ("name", t.term_name.clone()),
                        ("type", serde_name(&t.definition_type)),
                        ("referent", t.referent.clone().unwrap_or_default()),
                    ]
                })
                .collect()
        }
        "Document" => {
            let high_findings = assessment
                .finding_severities
                .iter()
                .filter(|s| **s == contract_risk::Severity::High)
                .count();
            vec![vec![
                ("contract_type", serde_name(&profile.contract_type.value)),
                ("type_confidence", profile.contract_type.confidence.to_string()),
                ("score", assessment.overall_score.to_string()),
                ("level", assessment.overall_level.to_string()),
                ("clauses", assessment.clauses.len().to_string()),
                ("findings", assessment.findings.len().to_string()),
                ("high_findings", high_findings.to_string()),
                ("parties", profile.parties.len().to_string()),
                ("amounts", profile.monetary_amounts.len().to_string()),
                ("durations", profile.durations.len().to_string()),
                ("dates", profile.dates.len().to_string()),
                ("vague_terms", profile.vague_terms.len().to_string()),
                ("provisions", profile.provisions.len().to_string()),
                ("adjustments", assessment.adjustments.len().to_string()),
            ]]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_fixture;
    use contract_risk::AnalyzerConfig;

    fn run(input: &str) -> MatchResult {
        let analyzer = RiskAnalyzer::new(&AnalyzerConfig::standard()).unwrap();
        let fixture = parse_fixture(input).unwrap();
        run_fixture(&analyzer, "inline.contract", &fixture).unwrap().1
    }

    #[test]
    fn test_span_assertion_passes() {
        let result = run("The Employee shall pay a «1:penalty» of ₹100,000 for breach.\n\
                          > [1]: Finding(category=penalty, severity=High)\n\
                          > [\"₹100,000\"]: Amount(value=100000, currency=INR)\n");
        assert!(result.all_passed(), "{:?}", result.results);
        assert_eq!(result.passed(), 2);
    }

    #[test]
    fn test_second_paragraph_offsets() {
        let result = run("The Tenant shall pay rent monthly.\n\
                          ---\n\
                          The Employer may «1:terminate this agreement at any time».\n\
                          > [1]: Finding(category=unilateral_termination, clause=1)\n\
                          > [1]: Clause(index=1, role=right)\n");
        assert!(result.all_passed(), "{:?}", result.results);
    }

    #[test]
    fn test_provision_and_topic() {
        let result = run("The Tenant «1:shall not sublet the premises».\n\
                          > [1]: Provision(kind=prohibition, text=sublet the premises)\n\
                          > [1]: Clause(role=restriction, topic=general)\n");
        assert!(result.all_passed(), "{:?}", result.results);
    }

    #[test]
    fn test_wrong_severity_fails() {
        let result = run("The Employee shall pay a «1:penalty» of ₹100,000.\n\
                          > [1]: Finding(category=penalty, severity=Low)\n");
        assert!(matches!(
            result.results[0].outcome,
            AssertionOutcome::Failed(ref fields) if fields[0].field == "severity"
        ));
        assert_eq!(result.results[0].span_text, "penalty");
    }

    #[test]
    fn test_missing_target_and_unknown_type() {
        let result = run("The Tenant shall pay rent.\n\
                          > [7]: Finding(category=penalty)\n\
                          > [\"rent\"]: Obligation(modal=shall)\n\
                          > [\"rent\"]: Document(score=0)\n");
        assert!(matches!(result.results[0].outcome, AssertionOutcome::NotFound { .. }));
        assert!(matches!(result.results[1].outcome, AssertionOutcome::Unsupported { .. }));
        assert!(matches!(result.results[2].outcome, AssertionOutcome::Unsupported { .. }));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("The Employee"), "employee");
        assert_eq!(normalize_name("\"Vendor\""), "vendor");
    }
}
