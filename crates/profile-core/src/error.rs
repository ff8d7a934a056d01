//! Error types for profile-core

use std::path::PathBuf;

/// Result type for profile-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in profile-core operations
///
/// Per-file problems found while scanning or validating are not errors; they
/// are collected into reports. These variants abort the current operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither `<Vendor>.json` nor `<Vendor>/` exists under the profiles root
    #[error("Vendor '{vendor}' not found under {root}")]
    VendorNotFound { vendor: String, root: String },

    /// The profiles root directory does not exist
    #[error("Profiles directory not found: {path}")]
    RootNotFound { path: String },

    /// The vendor manifest has a structural problem
    #[error("Invalid manifest for vendor '{vendor}': {reason}")]
    InvalidManifest { vendor: String, reason: String },

    /// Unknown profile type string
    #[error("Unknown profile type '{value}'")]
    UnknownProfileKind { value: String },

    /// Unknown policy string
    #[error("Unknown unresolved-entry policy '{value}' (expected 'append' or 'exclude')")]
    UnknownPolicy { value: String },

    /// A configuration layer could not be parsed
    #[error("Invalid configuration in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from profile-fs
    #[error(transparent)]
    Fs(#[from] profile_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
