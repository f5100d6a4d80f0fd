//! Error types for the analysis engine

use thiserror::Error;

/// Errors raised while building the engine or accepting caller payloads.
///
/// Analysis and comparison themselves never fail on well-formed input; an
/// empty document is a degenerate input, not an error.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Caller payload has the wrong shape (e.g. non-string entity members)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A configured pattern does not compile
    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration document could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(error: serde_json::Error) -> Self {
        AnalyzerError::Config(error.to_string())
    }
}

/// Result type for engine construction and input validation
pub type Result<T> = std::result::Result<T, AnalyzerError>;
