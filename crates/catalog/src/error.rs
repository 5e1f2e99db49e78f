//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Errors from the archive crate are kept as children in
//! the error tree.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A repository's sync database could not be extracted. The child error
    /// says whether the archive is missing, corrupt, or hostile.
    #[display("cannot extract sync database for repository: {_0}")]
    ArchiveExtraction(#[error(not(source))] String),
    /// A repository name that can't be used as a directory name.
    #[display("invalid repository name: {_0:?}")]
    InvalidRepository(#[error(not(source))] String),
    /// Filesystem failure on a workspace or database directory.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Reading a package descriptor failed part-way.
    #[display("malformed package descriptor")]
    MalformedRecord,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::MalformedRecord)
    }
}
