use crate::{AnalyzerConfig, ClauseDisplay, RiskAnalyzer, RiskAssessment};

fn analyze(text: &str) -> RiskAssessment {
    RiskAnalyzer::new(&AnalyzerConfig::standard())
        .unwrap()
        .analyze_text(text)
        .unwrap()
}

#[test]
fn finding_with_amount() {
    let assessment = analyze("Employee shall pay a penalty of ₹100,000 for breach.");
    let display = ClauseDisplay::new(&assessment.clauses[0])
        .with_assessment(&assessment)
        .with_amounts(&assessment.contract_profile);

    insta::assert_snapshot!(display, @r###"
    Employee shall pay a penalty of ₹100,000 for breach.
                         ╰─────╯Penalty/Liquidated Damages (High)
                                    ╰──────╯Amount(INR 100000)
    "###);
}

#[test]
fn finding_with_duration() {
    let assessment = analyze("Employee shall not compete for 2 years.");
    let display = ClauseDisplay::new(&assessment.clauses[0])
        .with_findings(&assessment.findings)
        .with_durations(&assessment.contract_profile);

    insta::assert_snapshot!(display, @r###"
    Employee shall not compete for 2 years.
                   ╰─────────╯Non-Compete
                                   ╰─────╯Duration(2 Years)
    "###);
}

#[test]
fn findings_of_other_clauses_are_skipped() {
    let assessment = analyze("The Tenant shall pay rent monthly.\n\nAny dispute shall be referred to arbitration.");
    let display = ClauseDisplay::new(&assessment.clauses[0]).with_findings(&assessment.findings);

    insta::assert_snapshot!(display, @"The Tenant shall pay rent monthly.");
}

#[test]
fn multi_line_clause_renders_on_one_line() {
    let text = "1. The Vendor shall\nindemnify the Buyer.\n2. The Buyer shall pay.";
    let assessment = analyze(text);
    let display = ClauseDisplay::new(&assessment.clauses[0]).with_assessment(&assessment);

    insta::assert_snapshot!(display, @r###"
    1. The Vendor shall indemnify the Buyer.
                        ╰───────╯Indemnification (High)
    "###);
}
