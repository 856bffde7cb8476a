//! Contract risk analysis.
//!
//! This crate turns plain contract text into a structured risk assessment:
//!
//! ## Pipeline Stages
//!
//! - [`ClauseSegmenter`] - Splits text into clauses (headings, paragraphs, sentences)
//! - [`EntityExtractor`] - Parties, defined terms, amounts, dates, durations,
//!   vague language, clause roles and the contract type
//! - [`RiskPatternMatcher`] - Negation-aware trigger matching against the [`RiskCatalog`]
//! - [`RiskScorer`] - Contextual severity adjustments and the 0-100 overall score
//! - [`RiskAnalyzer`] - Runs the stages in order and verifies the result
//!
//! ## Per-Clause Resolvers
//!
//! - [`ListMarkerResolver`] - Heading and list markers (1., (a), Section 3, WHEREAS)
//! - [`SentenceBoundaryResolver`] - Abbreviation-aware sentence splitting
//! - [`ContractKeywordResolver`] - Modal verbs (shall, may, must) and their negations
//! - [`DefinedTermResolver`] - Defined terms ("Company" means...)
//! - [`AmountResolver`] - Monetary amounts (₹1,00,000, Rs. 5 lakh, $2 million)
//! - [`TemporalResolver`] - Durations and calendar dates
//! - [`VagueTermResolver`] - Imprecise standards ("reasonable efforts")
//! - [`ProvisionResolver`] - Obligation, right and prohibition text
//! - [`ClauseTopicResolver`] - Clause subject (termination, payment, liability, ...)
//!
//! ## Confidence Scoring
//!
//! Heuristic results that carry uncertainty use a [`Scored<T>`] wrapper, where
//! `confidence < 1.0` means the result needs verification.
//!
//! ## Example
//!
//! ```
//! use contract_risk::{AnalyzerConfig, RiskAnalyzer, Severity};
//!
//! let analyzer = RiskAnalyzer::new(&AnalyzerConfig::standard()).unwrap();
//! let assessment = analyzer
//!     .analyze_text("Employee shall pay a penalty of ₹100,000 for breach.")
//!     .unwrap();
//! assert_eq!(assessment.clause_severity(0), Some(Severity::High));
//! ```

mod adjustment;
mod amount;
mod assessment;
mod audit;
mod catalog;
mod clause;
mod config;
mod contract_keyword;
mod contract_type;
mod defined_term;
mod display;
mod document;
mod error;
mod explain;
mod extractor;
mod hindi;
mod list_marker;
mod matcher;
mod obligation;
mod party;
mod provision;
mod scored;
mod scorer;
mod segmenter;
mod sentence_boundary;
mod temporal;
mod topic;
mod utils;
mod vague;

// Segment, extract, match, score
pub mod pipeline;

pub use adjustment::{AdjustmentRule, AppliedAdjustment, Condition, Effect};
pub use amount::{AmountResolver, Currency, MonetaryAmount};
pub use assessment::RiskAssessment;
pub use audit::{AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use catalog::{
    CompiledCatalog, CompiledCategory, CompiledMitigation, Mitigation, Precondition, Rationale,
    RiskCatalog, RiskCategory, RiskCategoryDef, Severity,
};
pub use clause::{Clause, ClauseRole};
pub use config::AnalyzerConfig;
pub use contract_keyword::{ContractKeyword, ContractKeywordResolver, KeywordMatch, ModalKind};
pub use contract_type::{ClassifierRules, ContractClassifier, ContractType, TypePhrase};
pub use defined_term::{DefinedTerm, DefinedTermResolver, DefinitionType};
pub use display::ClauseDisplay;
pub use document::{
    DocumentLoader, PlainTextLoader, Provenance, RawDocument, TextEncoding, DEFAULT_MAX_FILE_SIZE,
};
pub use error::{AnalysisError, CatalogError, DocumentLoadError};
pub use explain::{ExplanationError, ExplanationProvider, RecommendationProvider, Recommendations};
pub use extractor::{ContractProfile, EntityExtractor, Extraction};
pub use hindi::normalize_hindi_terms;
pub use list_marker::{ListMarker, ListMarkerResolver, MarkerMatch};
pub use matcher::{RiskFinding, RiskPatternMatcher};
pub use obligation::{ClauseRoleResolver, RoleAnnotation};
pub use party::{Party, PartyCollector, PartyRole};
pub use pipeline::RiskAnalyzer;
pub use provision::{Provision, ProvisionKind, ProvisionResolver};
pub use scored::{ScoreSource, Scored};
pub use scorer::{score_band, RiskScorer, ScoreCard, ScoringConfig};
pub use segmenter::ClauseSegmenter;
pub use sentence_boundary::{SentenceBoundary, SentenceBoundaryResolver, SentenceConfidence};
pub use temporal::{DateExpression, DurationExpression, DurationUnit, TemporalResolver};
pub use topic::{ClauseTopic, ClauseTopicResolver};
pub use vague::{VagueTerm, VagueTermResolver};

#[cfg(test)]
mod tests {
    mod display;
    mod matcher;
    mod pipeline;
    mod properties;
    mod segmenter;
}
