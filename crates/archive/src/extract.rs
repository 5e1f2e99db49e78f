use crate::error::{ErrorKind, Result};
use crate::path::sanitize;
use exn::ResultExt;
use karun_compress::Compression;
use karun_compress::error::ErrorKind as CompressionErrorKind;
use std::fs::{File, create_dir_all};
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tar::EntryType;
use tracing::instrument;

/// What an extraction wrote to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Compression layer detected on the archive.
    pub compression: Compression,
    /// Size of the decompressed tar stream, in bytes.
    pub tar_size: u64,
    pub directories: usize,
    pub files: usize,
    /// Entries that were neither files nor directories (links, devices, the
    /// `./` root entry).
    pub skipped: usize,
}

/// Extracts the compressed tar archive at `archive` into `dest`.
///
/// `dest` must already exist. The compression layer is detected from the
/// archive's magic bytes (plain tar is accepted too) and decompressed in full
/// to an anonymous temporary file inside `dest`, which disappears once the
/// extraction finishes, before any entry is written.
///
/// Extraction stops at the first failing entry; entries before it stay on
/// disk. Cleaning up a partial extraction is the caller's business.
#[instrument(skip_all, fields(archive = %archive.as_ref().display(), dest = %dest.as_ref().display()))]
pub fn extract(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<Summary> {
    let (archive, dest) = (archive.as_ref(), dest.as_ref());
    let open_error = || ErrorKind::Open(archive.to_path_buf());

    let mut source = File::open(archive).or_raise(open_error)?;
    let mut magic = Vec::with_capacity(Compression::MAGIC_LEN);
    (&mut source).take(Compression::MAGIC_LEN as u64).read_to_end(&mut magic).or_raise(open_error)?;
    source.rewind().or_raise(open_error)?;
    let compression = Compression::from_magic_bytes(&magic);

    let mut intermediate = tempfile::tempfile_in(dest).or_raise(|| ErrorKind::Write(dest.to_path_buf()))?;
    let tar_size = compression.decompress_stream(BufReader::new(source), &mut intermediate).map_err(|err| {
        let kind = match *err {
            CompressionErrorKind::Io => ErrorKind::Write(dest.to_path_buf()),
            _ => ErrorKind::Decompress,
        };
        err.raise(kind)
    })?;
    intermediate.rewind().or_raise(|| ErrorKind::Write(dest.to_path_buf()))?;
    tracing::debug!(%compression, tar_size, "Decompressed archive to intermediate file");

    let mut summary = Summary { compression, tar_size, ..Summary::default() };
    let mut tar = tar::Archive::new(BufReader::new(intermediate));
    for entry in tar.entries().or_raise(|| ErrorKind::InvalidArchive)? {
        let mut entry = entry.or_raise(|| ErrorKind::InvalidArchive)?;
        let name = entry.path().or_raise(|| ErrorKind::InvalidArchive)?.into_owned();
        let relative = sanitize(&name)?;
        let entry_type = entry.header().entry_type();
        // Pre-POSIX archives mark directories with a trailing slash only.
        let is_dir = entry_type.is_dir() || (entry_type.is_file() && entry.path_bytes().ends_with(b"/"));
        let is_file = !is_dir && matches!(entry_type, EntryType::Regular | EntryType::Continuous);

        if relative.as_os_str().is_empty() || !(is_dir || is_file) {
            tracing::trace!(entry = %name.display(), ?entry_type, "Skipping archive entry");
            summary.skipped += 1;
            continue;
        }
        let target = dest.join(&relative);
        if is_dir {
            create_dir_all(&target).or_raise(|| ErrorKind::Write(target.clone()))?;
            summary.directories += 1;
            continue;
        }
        // Archives are not required to list a directory before its contents.
        if let Some(parent) = target.parent() {
            create_dir_all(parent).or_raise(|| ErrorKind::Write(parent.to_path_buf()))?;
        }
        let mut out = File::create(&target).or_raise(|| ErrorKind::Write(target.clone()))?;
        std::io::copy(&mut entry, &mut out).or_raise(|| ErrorKind::Write(target.clone()))?;
        summary.files += 1;
    }

    tracing::debug!(
        directories = summary.directories,
        files = summary.files,
        skipped = summary.skipped,
        "Extracted archive"
    );
    Ok(summary)
}
