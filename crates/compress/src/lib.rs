//! Compression layer handling for pacman databases.
//!
//! `repo-add` can wrap a sync database in any of several compression formats
//! while still naming it `<repo>.db`, so the format is sniffed from the
//! leading bytes ([`Compression::from_magic_bytes`]) and then streamed
//! through the matching decoder ([`Compression::decompress_stream`]).
//! Encoders exist mostly so tests can produce real databases.
//!
//! Bzip2 and Gzip are always available. XZ and Zstd are behind the `xz` and
//! `zstd` features, both enabled by default because pacman uses them.

use derive_more::Display;

mod detect;
pub mod error;
mod ops;

/// A supported compression format.
///
/// Defaults to [`None`](Self::None), a plain uncompressed tar.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    #[display("none")]
    None,
    #[display("bzip2")]
    Bzip2,
    #[display("gzip")]
    Gzip,
    #[cfg(feature = "xz")]
    #[display("xz")]
    Xz,
    #[cfg(feature = "zstd")]
    #[display("zstd")]
    Zstd,
}
