//! Error types for notebook conversion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a notebook
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to serialize notebook: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unknown output format: {0}")]
    UnsupportedFormat(String),

    #[error("Automatic destination pathname needs a notebook name")]
    Naming,

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error(transparent)]
    Fetch(#[from] crate::remote::FetchError),
}

/// Result type for notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;
