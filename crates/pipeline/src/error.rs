//! Pipeline Error Types
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a pipeline failure.
///
/// ### Recovered locally (logged, page skipped)
/// - [`ErrorKind::Read`]
/// - [`ErrorKind::Decode`]
///
/// ### Propagated (the redirect document is still written)
/// - [`ErrorKind::Render`]
/// - [`ErrorKind::Enumerate`]
/// - [`ErrorKind::Interrupted`]
///
/// ### Terminal
/// - [`ErrorKind::Write`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream renderer failed.
    #[display("rendering failed")]
    Render,
    /// The output directory exists but could not be listed.
    #[display("failed to list output directory: {}", _0.display())]
    Enumerate(#[error(not(source))] PathBuf),
    /// A rendered page could not be read.
    #[display("failed to read page: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// A rendered page could not be decoded.
    #[display("failed to decode page: {}", _0.display())]
    Decode(#[error(not(source))] PathBuf),
    /// A termination signal arrived before the run completed.
    #[display("interrupted")]
    Interrupted,
    /// The redirect document could not be persisted.
    #[display("failed to write redirect document")]
    Write,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Interrupted | Self::Write)
    }
}
