//! The analysis pipeline: segment, extract, match, score.
//!
//! [`RiskAnalyzer`] compiles an [`AnalyzerConfig`] once and then analyzes any
//! number of documents. It holds no per-document state, so one analyzer can be
//! shared across threads behind an `Arc`.

use std::path::Path;
use std::sync::Arc;

use crate::{
    score_band, AnalysisError, AnalyzerConfig, AuditEvent, AuditSink, CompiledCatalog,
    ContractClassifier, DocumentLoader, EntityExtractor, RawDocument, RiskAssessment, RiskPatternMatcher,
    RiskScorer, ClauseSegmenter, TracingAuditSink,
};

mod invariants;

pub struct RiskAnalyzer {
    segmenter: ClauseSegmenter,
    extractor: EntityExtractor,
    catalog: CompiledCatalog,
    scorer: RiskScorer,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for RiskAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskAnalyzer")
            .field("categories", &self.catalog.categories().len())
            .finish_non_exhaustive()
    }
}

impl RiskAnalyzer {
    /// Validate and compile `config`. A malformed configuration is
    /// [`AnalysisError::CatalogConfiguration`].
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let catalog = CompiledCatalog::compile(&config.catalog)?;
        let classifier = ContractClassifier::compile(&config.classifier)?;
        let scorer = RiskScorer::compile(&config.scoring)?;

        Ok(Self {
            segmenter: ClauseSegmenter::new(),
            extractor: EntityExtractor::new(classifier),
            catalog,
            scorer,
            audit: Arc::new(TracingAuditSink),
        })
    }

    /// Route audit events to `sink` instead of `tracing`.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    pub fn catalog(&self) -> &CompiledCatalog {
        &self.catalog
    }

    /// Analyze one document.
    ///
    /// Blank input is [`AnalysisError::EmptyDocument`]. Every other input
    /// yields an assessment; unrecognized structure degrades to neutral values.
    pub fn analyze(&self, document: &RawDocument) -> Result<RiskAssessment, AnalysisError> {
        let provenance = document.provenance();
        self.audit.record(&AuditEvent::DocumentReceived {
            byte_length: provenance.byte_length,
            encoding: provenance.encoding,
        });

        match self.run(document.text()) {
            Ok(assessment) => {
                self.audit.record(&AuditEvent::AnalysisCompleted {
                    clause_count: assessment.clauses.len(),
                    finding_count: assessment.findings.len(),
                    overall_score: assessment.overall_score,
                    contract_type: assessment.contract_profile.contract_type.value,
                    category_counts: assessment.category_counts(),
                });
                Ok(assessment)
            }
            Err(err) => {
                self.audit.record(&AuditEvent::AnalysisFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Analyze in-memory UTF-8 text.
    pub fn analyze_text(&self, text: &str) -> Result<RiskAssessment, AnalysisError> {
        self.analyze(&RawDocument::from_text(text))
    }

    /// Load `path` with `loader`, then analyze it.
    pub fn analyze_path(
        &self,
        loader: &dyn DocumentLoader,
        path: &Path,
    ) -> Result<RiskAssessment, AnalysisError> {
        let document = loader.load(path)?;
        self.analyze(&document)
    }

    fn run(&self, text: &str) -> Result<RiskAssessment, AnalysisError> {
        let segmented = self.segmenter.segment(text)?;
        let segment_count = segmented.len();

        let extraction = self.extractor.extract(&segmented);
        let findings = RiskPatternMatcher::new(&self.catalog).find(&extraction.clauses, &extraction.profile);
        let card = self
            .scorer
            .score(&extraction.clauses, &findings, &extraction.profile, &self.catalog);

        let assessment = RiskAssessment {
            contract_profile: extraction.profile,
            clauses: extraction.clauses,
            findings,
            finding_severities: card.finding_severities,
            clause_severities: card.clause_severities,
            overall_score: card.overall_score,
            overall_level: score_band(card.overall_score),
            score_breakdown: card.score_breakdown,
            adjustments: card.adjustments,
        };

        invariants::verify(&assessment, segment_count)?;
        Ok(assessment)
    }
}
