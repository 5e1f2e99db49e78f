//! Streaming Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use bzip2::{Compression as BzCompression, read::BzDecoder, write::BzEncoder};
use exn::ResultExt;
use flate2::{Compression as GzCompression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use tracing::instrument;
#[cfg(feature = "xz")]
use xz2::{read::XzDecoder, write::XzEncoder};
#[cfg(feature = "zstd")]
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

// Matches the defaults of the tools `repo-add` shells out to.
const BZIP2_LEVEL: BzCompression = BzCompression::best();
const GZIP_LEVEL: GzCompression = GzCompression::new(6);
#[cfg(feature = "xz")]
const XZ_LEVEL: u32 = 6;
#[cfg(feature = "zstd")]
const ZSTD_LEVEL: i32 = 3;

impl Compression {
    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use karun_compress::Compression;
    ///
    /// let mut compressed = Vec::new();
    /// Compression::Gzip.compress_stream(Cursor::new(b"%NAME%\nlinux\n"), &mut compressed).unwrap();
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed)).unwrap();
    /// let mut desc = String::new();
    /// reader.read_to_string(&mut desc).unwrap();
    /// assert_eq!(desc, "%NAME%\nlinux\n");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzDecoder::new(reader)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Box::new(ZstdDecoder::new(reader).or_raise(|| ErrorKind::Codec)?),
        })
    }

    /// Wrap a writer with the appropriate compression layer.
    ///
    /// The stream is finalised when the returned writer is dropped.
    pub fn wrap_writer<'a, W: Write + 'a>(&self, writer: W) -> Result<Box<dyn Write + 'a>> {
        Ok(match self {
            Compression::None => Box::new(writer),
            Compression::Bzip2 => Box::new(BzEncoder::new(writer, BZIP2_LEVEL)),
            Compression::Gzip => Box::new(GzEncoder::new(writer, GZIP_LEVEL)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzEncoder::new(writer, XZ_LEVEL)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => {
                Box::new(ZstdEncoder::new(writer, ZSTD_LEVEL).or_raise(|| ErrorKind::Codec)?.auto_finish())
            },
        })
    }

    /// Compress from a reader to a writer, returning bytes read.
    pub fn compress_stream<'a, R: Read, W: Write + 'a>(&self, mut reader: R, writer: W) -> Result<u64> {
        let mut writer = self.wrap_writer(writer)?;
        let size = std::io::copy(&mut reader, &mut writer).or_raise(|| ErrorKind::Io)?;
        writer.flush().or_raise(|| ErrorKind::Io)?;
        Ok(size)
    }

    /// Decompress from a reader to a writer, returning bytes written.
    ///
    /// Read failures (including a corrupt compressed stream) are reported as
    /// [`ErrorKind::InvalidData`]; only the caller's writer can produce
    /// [`ErrorKind::Io`], which is why the copy is done by hand instead of
    /// [`std::io::copy`].
    #[instrument(skip(reader, writer), fields(format = %self, output_size))]
    pub fn decompress_stream<'a, R: Read + 'a, W: Write>(&self, reader: R, mut writer: W) -> Result<u64> {
        let mut reader = self.wrap_reader(reader)?;
        let mut buffer = [0u8; 8 * 1024];
        let mut size = 0u64;
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).or_raise(|| ErrorKind::InvalidData),
            };
            writer.write_all(&buffer[..read]).or_raise(|| ErrorKind::Io)?;
            size += read as u64;
        }
        writer.flush().or_raise(|| ErrorKind::Io)?;
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }
}
