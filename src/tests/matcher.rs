use crate::{
    ClassifierRules, ClauseSegmenter, CompiledCatalog, ContractClassifier, EntityExtractor,
    RiskCatalog, RiskCategory, RiskFinding, RiskPatternMatcher, Severity,
};

fn findings(text: &str) -> Vec<RiskFinding> {
    let catalog = CompiledCatalog::compile(&RiskCatalog::standard()).unwrap();
    let classifier = ContractClassifier::compile(&ClassifierRules::standard()).unwrap();
    let clauses = ClauseSegmenter::new().segment(text).unwrap();
    let extraction = EntityExtractor::new(classifier).extract(&clauses);
    RiskPatternMatcher::new(&catalog).find(&extraction.clauses, &extraction.profile)
}

fn categories(text: &str) -> Vec<(usize, RiskCategory)> {
    findings(text)
        .into_iter()
        .map(|f| (f.clause_index, f.category))
        .collect()
}

// ============ Negation ============

#[test]
fn negated_penalty_is_suppressed() {
    assert!(categories("The Contractor shall not be liable for penalty.").is_empty());
    assert!(categories("The Contractor shall not be liable for any penalty of ₹50,000.").is_empty());
}

#[test]
fn affirmative_penalty_with_amount_is_found() {
    let found = findings("The Contractor shall be liable for penalty of ₹50,000.");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, RiskCategory::Penalty);
    assert_eq!(found[0].matched_text, "penalty");
    assert_eq!(found[0].base_severity, Severity::High);
}

#[test]
fn negation_does_not_cross_punctuation() {
    // the cue belongs to the earlier phrase
    assert_eq!(
        categories("Delivery is not optional; the Vendor shall indemnify the Buyer."),
        vec![(0, RiskCategory::Indemnification)]
    );
}

#[test]
fn negation_window_is_bounded() {
    assert_eq!(
        categories("No waiver of any right under this agreement operates as consent and the Vendor shall indemnify the Buyer."),
        vec![(0, RiskCategory::Indemnification)]
    );
}

// ============ Preconditions ============

#[test]
fn penalty_requires_an_amount() {
    assert!(categories("The Supplier shall pay a penalty for late delivery.").is_empty());
    assert_eq!(
        categories("The Supplier shall pay a penalty of Rs. 5,000 per day of delay."),
        vec![(0, RiskCategory::Penalty)]
    );
}

// ============ Ordering ============

#[test]
fn one_finding_per_category_per_clause() {
    let found = findings("The Vendor shall indemnify and hold harmless the Buyer and shall pay indemnity costs.");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, RiskCategory::Indemnification);
    assert_eq!(found[0].matched_text, "indemnify");
}

#[test]
fn findings_are_ordered_by_clause_then_catalog() {
    let text = "The Client may terminate at any time. \
                Any dispute shall be resolved by arbitration and the Vendor shall indemnify the Client. \
                This agreement renews automatically each year.";
    assert_eq!(
        categories(text),
        vec![
            (0, RiskCategory::UnilateralTermination),
            (1, RiskCategory::Indemnification),
            (1, RiskCategory::ArbitrationJurisdiction),
            (2, RiskCategory::AutoRenewal),
        ]
    );
}

#[test]
fn matched_span_points_into_clause() {
    let text = "The Employee assigns all intellectual property to the Company.";
    let found = findings(text);
    assert_eq!(found[0].category, RiskCategory::IpAssignment);
    assert_eq!(&text[found[0].matched_span.clone()], found[0].matched_text);
}
