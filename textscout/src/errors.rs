use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan.
///
/// `InvalidRoot`, `EmptySearchTerm` and `ConfigError` stop a scan before it
/// starts, as does `DirectoryAccessDenied` for the root itself. Below the
/// root, denied directories and unreadable files become events and counters
/// instead of errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid root directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("Search term must not be empty")]
    EmptySearchTerm,
    #[error("Access denied: {path}: {reason}")]
    DirectoryAccessDenied { path: PathBuf, reason: String },
    #[error("Failed to read {path}: {reason}")]
    FileReadError { path: PathBuf, reason: String },
    #[error("File count failed: {0}")]
    CountingFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot(path.into())
    }

    pub fn directory_access_denied(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DirectoryAccessDenied {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn file_read_error(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FileReadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn counting_failed(msg: impl Into<String>) -> Self {
        Self::CountingFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<config::ConfigError> for ScanError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
