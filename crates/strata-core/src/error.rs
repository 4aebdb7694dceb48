//! Core error types for Strata.

use strata_indexer::IndexerError;
use thiserror::Error;

/// Errors that can occur in workspace operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Indexing engine error
    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),

    /// Invalid project path
    #[error("Invalid project path: {0}")]
    InvalidPath(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// No project is open
    #[error("No project is open")]
    NoSession,
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_indexer_error_conversion() {
        let err: CoreError = IndexerError::NotFound(PathBuf::from("/missing")).into();
        assert!(matches!(err, CoreError::Indexer(_)));
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{not: a list").unwrap_err();
        let err: CoreError = yaml_err.into();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
