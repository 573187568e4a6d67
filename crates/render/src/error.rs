//! Render Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("renderer not detected on your system: {_0}")]
    RendererNotFound(#[error(not(source))] String),
    /// The renderer exited with a non-zero exit code.
    #[display("renderer exited with code: {_0}")]
    RendererFailed(#[error(not(source))] i32),
    /// The renderer exited without an exit code (killed by a signal).
    #[display("renderer was terminated")]
    Terminated,
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Terminated | Self::Io)
    }
}
