//! Per-build scratch directory for extracted sync databases.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use karun_archive::Summary;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, warn};

const WORKSPACE_PREFIX: &str = "karun-";

/// A directory, unique to one catalog build, holding one subdirectory per
/// extracted repository.
///
/// The directory outlives the value; call [`Workspace::remove`] to delete it.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

/// What [`Workspace::extract_repository`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Extracted(Summary),
    /// The repository's directory already existed and was left untouched.
    AlreadyPresent,
}

impl Workspace {
    /// Creates a fresh workspace under `root`, creating `root` if needed.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).or_raise(|| ErrorKind::Io(root.to_path_buf()))?;
        let path = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)
            .or_raise(|| ErrorKind::Io(root.to_path_buf()))?
            .keep();
        debug!(path = %path.display(), "Created workspace");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory a repository's sync database is extracted into.
    pub fn repo_dir(&self, repo: &str) -> Result<PathBuf> {
        let mut components = Path::new(repo).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name.to_str() == Some(repo) => Ok(self.path.join(name)),
            _ => exn::bail!(ErrorKind::InvalidRepository(repo.to_string())),
        }
    }

    /// Extracts `archive` into the repository's directory, unless that
    /// directory already exists.
    ///
    /// On failure the partially populated directory is removed again so a
    /// later call doesn't mistake it for a finished extraction.
    #[instrument(skip(self, archive), fields(archive = %archive.as_ref().display()))]
    pub fn extract_repository(&self, repo: &str, archive: impl AsRef<Path>) -> Result<Extraction> {
        let dest = self.repo_dir(repo)?;
        if dest.exists() {
            debug!(dest = %dest.display(), "Repository already extracted");
            return Ok(Extraction::AlreadyPresent);
        }
        fs::create_dir(&dest).or_raise(|| ErrorKind::Io(dest.clone()))?;
        let summary = karun_archive::extract(archive, &dest)
            .inspect_err(|_| {
                if let Err(err) = fs::remove_dir_all(&dest) {
                    warn!(dest = %dest.display(), error = %err, "Could not remove partial extraction");
                }
            })
            .or_raise(|| ErrorKind::ArchiveExtraction(repo.to_string()))?;
        debug!(files = summary.files, skipped = summary.skipped, "Extracted repository");
        Ok(Extraction::Extracted(summary))
    }

    /// Deletes the workspace and everything in it.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn remove(self) -> Result<()> {
        fs::remove_dir_all(&self.path).or_raise(|| ErrorKind::Io(self.path.clone()))?;
        debug!("Removed workspace");
        Ok(())
    }
}
