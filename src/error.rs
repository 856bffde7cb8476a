//! Error types for the analysis pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single `analyze` call.
///
/// Recoverable conditions (no parties found, `Unknown` contract type, clauses
/// without findings) are not errors; they degrade to neutral values inside the
/// returned assessment.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("document contains no analyzable text")]
    EmptyDocument,

    #[error("risk catalog configuration error: {0}")]
    CatalogConfiguration(#[from] CatalogError),

    #[error("internal invariant violated: {message}")]
    InternalInvariantViolation { message: String },

    #[error(transparent)]
    DocumentLoad(#[from] DocumentLoadError),
}

/// A malformed analyzer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("invalid trigger for {category}: `{pattern}`: {message}")]
    InvalidTrigger {
        category: String,
        pattern: String,
        message: String,
    },

    #[error("category {0} has no trigger patterns")]
    NoTriggers(String),

    #[error("category {0} is defined more than once")]
    DuplicateCategory(String),

    #[error("invalid pattern in mitigation `{name}`: {message}")]
    InvalidMitigation { name: String, message: String },

    #[error("invalid adjustment rule `{name}`: {message}")]
    InvalidAdjustment { name: String, message: String },

    #[error("invalid classifier phrase `{pattern}`: {message}")]
    InvalidClassifierPhrase { pattern: String, message: String },

    #[error("scoring parameter `{name}` must be positive and finite, got {value}")]
    InvalidScoringParameter { name: &'static str, value: f64 },

    #[error("unknown-type discount must lie in (0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("failed to read configuration {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// Failure reported by a [`DocumentLoader`](crate::DocumentLoader).
#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file format `{extension}` (supported: {supported})")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
