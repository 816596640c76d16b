//! Error types for StrataKV
//!
//! Provides a unified error type for all operations.

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StrataError
pub type Result<T> = std::result::Result<T, StrataError>;

/// Unified error type for StrataKV operations
#[derive(Debug, Error)]
pub enum StrataError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database at {0} is locked by another instance")]
    Locked(PathBuf),

    #[error("Key not found")]
    KeyNotFound,

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Scan deadline exceeded")]
    Timeout,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StrataError {
    /// Wrap an engine error with the operation that produced it
    pub(crate) fn storage(context: &'static str, e: impl Display) -> Self {
        StrataError::Storage(format!("{context}: {e}"))
    }

    /// True for errors caused by the request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StrataError::InvalidPattern(_) | StrataError::InvalidPagination(_)
        )
    }
}

impl From<regex::Error> for StrataError {
    fn from(e: regex::Error) -> Self {
        StrataError::InvalidPattern(e.to_string())
    }
}
