//! Extraction of compressed tar archives (pacman sync databases) onto disk.
//!
//! The compression layer is sniffed from the archive's leading bytes and
//! fully decompressed to an anonymous intermediate file before the tar stream
//! is walked, entry by entry, in stream order. Every entry name is sanitized
//! with [`sanitize_entry_path`] before it is joined to the destination, so a
//! hostile archive cannot write outside of it.

pub mod error;
mod extract;
mod path;

pub use crate::extract::{Summary, extract};
pub use crate::path::sanitize as sanitize_entry_path;
