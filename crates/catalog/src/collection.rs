//! Catalog construction.
//!
//! A build runs in three phases:
//!
//! 1. Extract the sync database of every repository in scope into a fresh
//!    [`Workspace`].
//! 2. Read every package directory of those repositories into the catalog,
//!    in configuration order. A package offered by several repositories ends
//!    up with the record of the last one.
//! 3. Merge the local database: installed packages already in the catalog
//!    get their `local_version` set. Packages installed from elsewhere are
//!    added only when every repository is in scope.

use crate::desc::{self, Descriptor};
use crate::error::{ErrorKind, Result};
use crate::record::{Catalog, PackageRecord};
use crate::workspace::Workspace;
use derive_more::Display;
use exn::ResultExt;
use karun_config::RepositoryConfig;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Scope name that selects every configured repository.
pub const ALL_REPOSITORIES: &str = "*all*";

/// Which repositories a build covers.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Scope {
    #[display("{_0}")]
    Repository(String),
    #[display("*all*")]
    All,
}

impl FromStr for Scope {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            ALL_REPOSITORIES => Self::All,
            repo => Self::Repository(repo.to_string()),
        })
    }
}

impl Scope {
    /// Repositories to extract and read, in order. A single repository
    /// doesn't have to be configured, only its sync database must exist.
    fn repositories<'a>(&'a self, config: &'a RepositoryConfig) -> Vec<&'a str> {
        match self {
            Self::Repository(repo) => vec![repo.as_str()],
            Self::All => config.repos.iter().map(String::as_str).collect(),
        }
    }
}

/// What to do with each record found while traversing a database directory.
#[derive(Debug, Clone, Copy)]
enum Action<'a> {
    /// Insert, or replace, stamped with the repository name.
    Insert { repo: &'a str },
    /// Set `local_version` on the matching record. Unmatched records are
    /// added as local-only when `keep_unmatched` is set.
    MergeLocal { keep_unmatched: bool },
}

impl Action<'_> {
    fn apply(self, catalog: &mut Catalog, mut record: PackageRecord) {
        match self {
            Self::Insert { repo } => {
                record.repo = repo.to_string();
                if let Some(previous) = catalog.insert(record) {
                    debug!(name = %previous.name, previous = %previous.repo, repo, "Package replaced");
                }
            },
            Self::MergeLocal { keep_unmatched } => match catalog.get_mut(&record.name) {
                Some(existing) => existing.local_version = record.repo_version,
                None if keep_unmatched => {
                    record.repo.clear();
                    record.local_version = record.repo_version.clone();
                    catalog.insert(record);
                },
                None => {},
            },
        }
    }
}

/// Applies `action` to the descriptor of every package directory in `dir`.
///
/// A missing `dir` is an empty database. Returns the number of records
/// applied.
#[instrument(skip_all, fields(dir = %dir.display(), ?action))]
fn traverse(dir: &Path, action: Action<'_>, catalog: &mut Catalog) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Database directory does not exist");
            return Ok(0);
        },
        Err(err) => return Err(err).or_raise(|| ErrorKind::Io(dir.to_path_buf())),
    };
    let mut applied = 0;
    for entry in entries {
        let path = entry.or_raise(|| ErrorKind::Io(dir.to_path_buf()))?.path();
        if !path.is_dir() {
            continue;
        }
        match desc::read_package(&path) {
            Descriptor::Parsed(record) => {
                action.apply(catalog, record);
                applied += 1;
            },
            Descriptor::Skipped { path, reason } => {
                warn!(path = %path.display(), %reason, "Skipping package");
            },
        }
    }
    Ok(applied)
}

fn populate(scope: &Scope, config: &RepositoryConfig, workspace: &Workspace) -> Result<Catalog> {
    let repos = scope.repositories(config);
    for repo in &repos {
        workspace.extract_repository(repo, config.sync_db(repo))?;
    }

    let mut catalog = Catalog::default();
    for &repo in &repos {
        let applied = traverse(&workspace.repo_dir(repo)?, Action::Insert { repo }, &mut catalog)?;
        debug!(repo, packages = applied, "Read sync database");
    }

    let merge = Action::MergeLocal { keep_unmatched: *scope == Scope::All };
    let installed = traverse(&config.local_dir(), merge, &mut catalog)?;
    debug!(installed, "Merged local database");
    catalog.seal();
    Ok(catalog)
}

/// A built catalog and the workspace its sync databases were extracted into.
#[derive(Debug)]
pub struct PackageCollection {
    scope: Scope,
    catalog: Catalog,
    workspace: Workspace,
}

impl PackageCollection {
    /// Builds the catalog for `scope`, extracting into a new workspace under
    /// `workspace_root`.
    ///
    /// Fails if a sync database of a repository in scope can't be extracted,
    /// or a database directory can't be listed; the workspace is removed
    /// again in that case. Unreadable package descriptors are skipped.
    #[instrument(skip_all, fields(%scope))]
    pub fn build(scope: Scope, config: &RepositoryConfig, workspace_root: impl AsRef<Path>) -> Result<Self> {
        let workspace = Workspace::create(workspace_root)?;
        match populate(&scope, config, &workspace) {
            Ok(catalog) => {
                info!(packages = catalog.len(), workspace = %workspace.path().display(), "Catalog built");
                Ok(Self { scope, catalog, workspace })
            },
            Err(err) => {
                let path = workspace.path().to_path_buf();
                if let Err(cleanup) = workspace.remove() {
                    warn!(path = %path.display(), error = ?cleanup, "Could not remove workspace");
                }
                Err(err)
            },
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn into_parts(self) -> (Catalog, Workspace) {
        (self.catalog, self.workspace)
    }
}
