//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The archive itself could not be opened or read.
    #[display("cannot open archive: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The compression layer is corrupt or truncated.
    #[display("cannot decompress archive")]
    Decompress,
    /// The decompressed stream is not a valid tar archive.
    #[display("invalid tar archive")]
    InvalidArchive,
    /// An entry name escapes the destination or contains forbidden bytes.
    /// Nothing is written for the offending entry.
    #[display("unsafe archive entry: {}", _0.display())]
    UnsafeEntry(#[error(not(source))] PathBuf),
    /// Writing an entry (or the intermediate file) to disk failed.
    #[display("cannot write: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Disk full, permissions fixed, etc. The archive is what it is.
        matches!(self, Self::Open(_) | Self::Write(_))
    }
}
