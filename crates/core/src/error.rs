//! Error types for fplscout.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: feed ingestion, embedding, index persistence, answer
//! generation, configuration, and I/O.

use thiserror::Error;

/// Unified error type for fplscout.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream feed unreachable or payload malformed
    #[error("Feed error: {0}")]
    Fetch(String),

    /// A text could not be embedded
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM provider errors (transport, authentication, quota)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Answer generation failed at the completion capability
    #[error("Generation error: {0}")]
    Generation(String),

    /// Saving or loading the index failed for a reason other than absence
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Index location absent or not a valid snapshot; recoverable, and
    /// callers fall back to the collect -> build -> persist path
    #[error("Not found: {0}")]
    NotFound(String),

    /// A query was attempted before any index was built or loaded
    #[error("No index has been built or loaded")]
    NoIndex,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Fetch("connection refused".to_string());
        assert_eq!(err.to_string(), "Feed error: connection refused");

        let err = AppError::NoIndex;
        assert_eq!(err.to_string(), "No index has been built or loaded");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
