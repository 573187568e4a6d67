//! Redirect Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A redirect error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for redirect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The in-memory document could not be encoded as JSON.
    #[display("failed to encode redirect document")]
    Encode,
    /// The destination path cannot hold a file (empty, or names a directory).
    #[display("invalid destination: {}", _0.display())]
    InvalidDestination(#[error(not(source))] PathBuf),
    /// The destination (or its parent directory) could not be written.
    #[display("failed to write redirect document: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Disk full, permissions fixed, etc.
        matches!(self, Self::Write(_))
    }
}
