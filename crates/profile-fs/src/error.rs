//! Error types for profile-fs

use std::path::PathBuf;

/// Result type for profile-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in profile-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to serialize JSON for {path}: {message}")]
    JsonSerialize { path: PathBuf, message: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse error from a serde_json error, keeping its position.
    pub fn json_parse(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
