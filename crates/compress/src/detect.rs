//! Format detection from leading bytes.

use crate::Compression;

/// Leading bytes of each compressed format, checked in order.
const SIGNATURES: &[(&[u8], Compression)] = &[
    (b"BZh", Compression::Bzip2),
    (&[0x1F, 0x8B], Compression::Gzip),
    #[cfg(feature = "xz")]
    (&[0xFD, b'7', b'z', b'X', b'Z', 0x00], Compression::Xz),
    #[cfg(feature = "zstd")]
    (&[0x28, 0xB5, 0x2F, 0xFD], Compression::Zstd),
];

impl Compression {
    /// Number of leading bytes needed to recognise every supported format.
    pub const MAGIC_LEN: usize = 6;

    /// Detects the compression layer from the first bytes of a stream.
    ///
    /// Anything unrecognised, including input too short to tell, is taken to
    /// be an uncompressed tar. A sync database is `<repo>.db` whatever its
    /// compression, so the name is no help.
    ///
    /// ```
    /// use karun_compress::Compression;
    /// assert_eq!(Compression::from_magic_bytes(&[0x1F, 0x8B, 0x08]), Compression::Gzip);
    /// assert_eq!(Compression::from_magic_bytes(b"linux-6.9.1-1/"), Compression::None);
    /// ```
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
            .map_or(Compression::None, |&(_, format)| format)
    }
}
