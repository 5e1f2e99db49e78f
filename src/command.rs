use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use karun_catalog::{Catalog, PackageCollection, PackageRecord, Scope};
use karun_config::{ConfigCache, RepositoryConfig, Settings};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Shown in place of a repository for packages no repository provides.
const LOCAL_REPOSITORY: &str = "local";

pub struct Context {
    settings: Settings,
    configs: ConfigCache,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self { settings, configs: ConfigCache::new() }
    }

    fn pacman_conf(&self) -> &Path {
        &self.settings.pacman_conf
    }

    fn repository_config(&self) -> Result<Arc<RepositoryConfig>> {
        self.configs
            .get(self.pacman_conf())
            .or_raise(|| ErrorKind::Config(self.pacman_conf().to_path_buf()))
    }

    /// Builds the catalog for `repo`, or every repository, then disposes of
    /// the workspace unless settings say to keep it.
    fn catalog(&self, repo: Option<String>) -> Result<Catalog> {
        let config = self.repository_config()?;
        let scope = repo.map_or(Scope::All, Scope::Repository);
        let collection =
            PackageCollection::build(scope, &config, &self.settings.workspace_root).or_raise(|| ErrorKind::Catalog)?;
        let (catalog, workspace) = collection.into_parts();
        if self.settings.keep_workspace {
            info!(path = %workspace.path().display(), "Keeping workspace");
        } else {
            let path = workspace.path().to_path_buf();
            workspace.remove().or_raise(|| ErrorKind::Workspace(path))?;
        }
        Ok(catalog)
    }

    pub fn repos(&self) -> Result<()> {
        let config = self.repository_config()?;
        println!("Configuration: {}", config.conf_path.display());
        println!("DBPath:        {}", config.db_path.display());
        println!("CacheDir:      {}", config.cache_dir.display());
        for repo in &config.repos {
            println!("[{repo}] {}", config.sync_db(repo).display());
        }
        Ok(())
    }

    pub fn list(&self, repo: Option<String>, installed: bool, out_of_sync: bool) -> Result<()> {
        let catalog = self.catalog(repo)?;
        catalog
            .sorted()
            .into_iter()
            .filter(|record| !installed || record.is_installed())
            .filter(|record| !out_of_sync || record.is_out_of_sync())
            .for_each(|record| println!("{}", format_record(record)));
        Ok(())
    }

    pub fn search(&self, term: &str, repo: Option<String>) -> Result<()> {
        let catalog = self.catalog(repo)?;
        let mut matches: Vec<_> = catalog.search(term).collect();
        matches.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        for record in matches {
            println!("{}", format_record(record));
            if !record.description.is_empty() {
                println!("    {}", record.description);
            }
        }
        Ok(())
    }
}

/// `repo/name version [installed: version]`
fn format_record(record: &PackageRecord) -> String {
    let repo = if record.is_local_only() { LOCAL_REPOSITORY } else { &record.repo };
    let mut line = format!("{repo}/{} {}", record.name, record.repo_version);
    if record.is_installed() {
        line.push_str(&format!(" [installed: {}]", record.local_version));
    }
    line
}
