//! Error types for the fixture harness.

use contract_risk::AnalysisError;
use thiserror::Error;

/// Errors that can occur while loading or running a fixture.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Error parsing a fixture file.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Error loading a fixture file.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// The analyzer rejected the fixture document.
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;
