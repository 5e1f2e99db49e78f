//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration file is missing, not a regular file, or unreadable.
    /// Point at a different file.
    #[display("bad configuration path: {}", _0.display())]
    ConfigPath(#[error(not(source))] PathBuf),
    /// The file was opened but reading it failed part-way.
    #[display("I/O error reading: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Application settings could not be merged or deserialized.
    #[display("invalid settings")]
    Settings,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
