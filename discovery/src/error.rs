//! Error types for summary runs.
//!
//! Every failure aborts the whole run. A report that is simply absent is not
//! an error and never reaches this type.

use std::path::PathBuf;

use thiserror::Error;

use crate::extractor::ExtractError;

/// Errors that can occur while building a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A directory the run depends on is missing or is not a directory.
    #[error("directory '{}' does not exist or is not accessible", .0.display())]
    MissingDirectory(PathBuf),

    /// File I/O failure outside report extraction.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report could not be read, or a tracked label carried a malformed value.
    #[error("failed to extract '{}': {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    /// YAML parsing failure in a config file.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file content that parses but cannot be applied.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`SummaryError`].
pub type Result<T> = std::result::Result<T, SummaryError>;
