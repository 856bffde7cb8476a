use once_cell::sync::Lazy;
use proptest::prelude::*;

use crate::{AnalysisError, AnalyzerConfig, ClauseSegmenter, RiskAnalyzer};

#[allow(clippy::unwrap_used)]
static ANALYZER: Lazy<RiskAnalyzer> =
    Lazy::new(|| RiskAnalyzer::new(&AnalyzerConfig::standard()).unwrap());

/// Single-sentence clauses. Documents join them as paragraphs, some of them
/// numbered, so both heading and sentence segmentation are exercised.
const CLAUSES: [&str; 12] = [
    "The Employee shall not engage in any competing business for 2 years after termination.",
    "The Employer may terminate this agreement at any time without notice.",
    "The Employee shall pay a penalty of ₹100,000 for breach.",
    "The Tenant shall pay rent monthly.",
    "The Vendor shall deliver the goods within thirty (30) days.",
    "This agreement renews automatically each year.",
    "Any dispute shall be resolved by arbitration in Mumbai.",
    "The Consultant assigns all intellectual property to the Client.",
    "The parties shall meet quarterly to review progress.",
    "The Supplier shall use reasonable efforts to deliver on time.",
    "The liability of the Vendor shall not exceed the fees paid.",
    "The Director shall personally guarantee all payments.",
];

const HIGH_RISK_CLAUSE: &str = "The Vendor shall indemnify the Buyer against all claims.";

fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec((prop::sample::select(CLAUSES.to_vec()), any::<bool>()), 1..8).prop_map(
        |clauses| {
            clauses
                .iter()
                .enumerate()
                .map(|(i, (clause, numbered))| {
                    if *numbered {
                        format!("{}. {clause}", i + 1)
                    } else {
                        clause.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        },
    )
}

proptest! {
    #[test]
    fn score_is_bounded_and_clauses_match_segmenter(doc in arb_document()) {
        let assessment = ANALYZER.analyze_text(&doc).unwrap();
        let segmented = ClauseSegmenter::new().segment(&doc).unwrap();
        prop_assert_eq!(assessment.clauses.len(), segmented.len());
        prop_assert!(assessment.overall_score <= 100);
    }

    #[test]
    fn analysis_is_idempotent(doc in arb_document()) {
        let first = ANALYZER.analyze_text(&doc).unwrap();
        let second = ANALYZER.analyze_text(&doc).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn clause_indices_are_contiguous(doc in arb_document()) {
        let assessment = ANALYZER.analyze_text(&doc).unwrap();
        for (i, clause) in assessment.clauses.iter().enumerate() {
            prop_assert_eq!(clause.index(), i);
        }
        for finding in &assessment.findings {
            prop_assert!(finding.clause_index < assessment.clauses.len());
        }
        let keys: Vec<usize> = assessment.clause_severities.keys().copied().collect();
        prop_assert_eq!(keys, (0..assessment.clauses.len()).collect::<Vec<_>>());
    }

    #[test]
    fn adding_a_high_risk_clause_never_lowers_the_score(doc in arb_document(), numbered in any::<bool>()) {
        let before = ANALYZER.analyze_text(&doc).unwrap();
        let added = if numbered {
            format!("{doc}\n\n99. {HIGH_RISK_CLAUSE}")
        } else {
            format!("{doc}\n\n{HIGH_RISK_CLAUSE}")
        };
        let after = ANALYZER.analyze_text(&added).unwrap();
        prop_assert_eq!(after.clauses.len(), before.clauses.len() + 1);
        prop_assert!(after.overall_score >= before.overall_score);
    }

    #[test]
    fn arbitrary_text_never_panics(text in "[a-zA-Z0-9 .,;:()₹$\n]{0,200}") {
        match ANALYZER.analyze_text(&text) {
            Ok(assessment) => prop_assert!(assessment.overall_score <= 100),
            Err(AnalysisError::EmptyDocument) => prop_assert!(text.trim().is_empty()),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
