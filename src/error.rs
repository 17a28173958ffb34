//! Error types for the vocal chain analysis engine

use thiserror::Error;

/// Errors that can occur during analysis
///
/// Only [`AnalysisError::InvalidInput`] and [`AnalysisError::ConfigurationError`] ever reach
/// callers of the public pipeline. [`AnalysisError::ExtractionFailure`] is produced inside
/// individual analyzers and resolved there by substituting the analyzer's default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Input buffer is unusable (empty, zero sample rate, entirely non-finite, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value is outside its sane range
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Recoverable numeric failure inside a single analyzer
    #[error("Extraction failure in {analyzer}: {reason}")]
    ExtractionFailure {
        /// Analyzer that failed (e.g. "tempo", "loudness")
        analyzer: &'static str,
        /// What went wrong
        reason: String,
    },
}

impl AnalysisError {
    /// Shorthand for building an [`AnalysisError::ExtractionFailure`]
    pub fn extraction(analyzer: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::ExtractionFailure {
            analyzer,
            reason: reason.into(),
        }
    }

    /// True for the two error kinds that abort an analysis call
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AnalysisError::ExtractionFailure { .. })
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::ConfigurationError(format!("Malformed configuration: {}", err))
    }
}
