//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The page is not valid UTF-8; the renderer never produces such output,
    /// so the page is most likely truncated or corrupt.
    #[display("page is not valid UTF-8")]
    Encoding,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The page bytes are either decodable or they aren't.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Encoding.to_string(), "page is not valid UTF-8");
    }

    #[test]
    fn nothing_is_retryable() {
        assert!(!ErrorKind::Encoding.is_retryable());
    }
}
