//! Error types for the fmbatch library
//!
//! Every fallible library operation returns [`FmBatchError`]. The batch drivers
//! treat most of these as per-file failures: the offending file is logged and
//! skipped, and the run carries on.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum FmBatchError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Front matter block could not be split or decoded
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// Directory enumeration failed below a scan root
    #[error("Cannot read directory {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    /// Missing or contradictory run configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FmBatchError>;

impl FmBatchError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new directory enumeration error
    pub fn walk(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Walk {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Attach a file path to a codec error that was raised without one
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::InvalidFrontMatter { path: p, reason } if p.as_os_str().is_empty() => {
                Self::InvalidFrontMatter {
                    path: path.into(),
                    reason,
                }
            }
            other => other,
        }
    }
}
