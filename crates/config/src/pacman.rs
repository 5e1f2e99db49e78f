//! pacman.conf reader.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const DEFAULT_CONF_PATH: &str = "/etc/pacman.conf";
pub const DEFAULT_DB_PATH: &str = "/var/lib/pacman/";
pub const DEFAULT_CACHE_DIR: &str = "/var/cache/pacman/pkg/";
/// The one section of pacman.conf that isn't a repository.
const OPTIONS_SECTION: &str = "options";

/// The parts of pacman.conf a catalog build cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// File this configuration was read from.
    pub conf_path: PathBuf,
    /// Repository section names, in declaration order. Duplicates are kept.
    pub repos: Vec<String>,
    /// Root of the sync and local databases (`DBPath`).
    pub db_path: PathBuf,
    /// Package cache (`CacheDir`).
    pub cache_dir: PathBuf,
}

impl RepositoryConfig {
    /// An empty configuration with pacman's default paths.
    pub fn new(conf_path: impl Into<PathBuf>) -> Self {
        Self {
            conf_path: conf_path.into(),
            repos: Vec::new(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }

    /// Reads and parses the pacman.conf at `path`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConfigPath`] if `path` doesn't exist, isn't a regular
    ///   file, or can't be opened.
    /// - [`ErrorKind::Io`] if reading fails after the file was opened.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).or_raise(|| ErrorKind::ConfigPath(path.to_path_buf()))?;
        if !metadata.is_file() {
            exn::bail!(ErrorKind::ConfigPath(path.to_path_buf()));
        }
        let file = File::open(path).or_raise(|| ErrorKind::ConfigPath(path.to_path_buf()))?;
        let config = Self::parse(path, BufReader::new(file))?;
        tracing::debug!(
            repos = ?config.repos,
            db_path = %config.db_path.display(),
            cache_dir = %config.cache_dir.display(),
            "Read pacman configuration"
        );
        Ok(config)
    }

    /// Parses pacman.conf content from `reader`, attributing it to `conf_path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use karun_config::RepositoryConfig;
    ///
    /// let conf = "[options]\nDBPath = /srv/pacman/\n\n[core]\n[extra]\n";
    /// let config = RepositoryConfig::parse("pacman.conf", conf.as_bytes()).unwrap();
    /// assert_eq!(config.repos, ["core", "extra"]);
    /// assert_eq!(config.db_path, Path::new("/srv/pacman/"));
    /// ```
    pub fn parse(conf_path: impl Into<PathBuf>, mut reader: impl BufRead) -> Result<Self> {
        let mut config = Self::new(conf_path);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let read = reader.read_until(b'\n', &mut buffer).or_raise(|| ErrorKind::Io(config.conf_path.clone()))?;
            if read == 0 {
                break;
            }
            config.apply(&normalize_space(&String::from_utf8_lossy(&buffer)));
        }
        Ok(config)
    }

    fn apply(&mut self, line: &str) {
        if line.starts_with('#') {
            return;
        }
        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let section = &line[1..line.len() - 1];
            if section != OPTIONS_SECTION {
                self.repos.push(section.to_string());
            }
        } else if line.starts_with("DBPath")
            && let Some(value) = directive_value(line)
        {
            self.db_path = PathBuf::from(value);
        } else if line.starts_with("CacheDir")
            && let Some(value) = directive_value(line)
        {
            self.cache_dir = PathBuf::from(value);
        }
    }

    /// Directory holding one `<repo>.db` archive per repository.
    pub fn sync_dir(&self) -> PathBuf {
        self.db_path.join("sync")
    }

    /// Expected sync database archive for `repo`.
    pub fn sync_db(&self, repo: &str) -> PathBuf {
        self.sync_dir().join(format!("{repo}.db"))
    }

    /// Directory of installed packages, one subdirectory each.
    pub fn local_dir(&self) -> PathBuf {
        self.db_path.join("local")
    }
}

/// Everything after the first `=`, trimmed.
fn directive_value(line: &str) -> Option<&str> {
    match line.split_once('=') {
        Some((_, value)) => Some(value.trim()),
        None => {
            tracing::warn!(line, "Ignoring pacman.conf directive without a value");
            None
        },
    }
}

/// Trims and collapses every run of whitespace to a single space.
fn normalize_space(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ARCH_CONF: &str = "\
#
# /etc/pacman.conf
#
[options]
#RootDir     = /
#DBPath      = /var/lib/pacman/
#CacheDir    = /var/cache/pacman/pkg/
HoldPkg     = pacman glibc
Architecture = auto
SigLevel    = Required DatabaseOptional

#[core-testing]
#Include = /etc/pacman.d/mirrorlist

[core]
Include = /etc/pacman.d/mirrorlist

[extra]
Include = /etc/pacman.d/mirrorlist

[multilib]
Include = /etc/pacman.d/mirrorlist
";

    fn parse(content: &str) -> RepositoryConfig {
        RepositoryConfig::parse("pacman.conf", content.as_bytes()).unwrap()
    }

    #[test]
    fn test_stock_configuration() {
        let config = parse(ARCH_CONF);
        assert_eq!(config.repos, ["core", "extra", "multilib"]);
        assert_eq!(config.db_path, Path::new(DEFAULT_DB_PATH));
        assert_eq!(config.cache_dir, Path::new(DEFAULT_CACHE_DIR));
        assert_eq!(config.conf_path, Path::new("pacman.conf"));
    }

    #[test]
    fn test_path_overrides() {
        let config = parse("[options]\nDBPath = /srv/db/\n  CacheDir\t=   /srv/cache/   \n");
        assert_eq!(config.db_path, Path::new("/srv/db/"));
        assert_eq!(config.cache_dir, Path::new("/srv/cache/"));
        assert!(config.repos.is_empty());
    }

    #[rstest]
    // Everything after the first `=` is the value.
    #[case("DBPath = /weird=path/", "/weird=path/")]
    #[case("DBPath=/tight/", "/tight/")]
    // Missing `=` leaves the default untouched.
    #[case("DBPath /no/equals/", DEFAULT_DB_PATH)]
    // Last declaration wins.
    #[case("DBPath = /first/\nDBPath = /second/", "/second/")]
    fn test_db_path_value(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(parse(content).db_path, Path::new(expected));
    }

    #[test]
    fn test_duplicate_sections_are_kept_in_order() {
        let config = parse("[extra]\n[core]\n[options]\n[extra]\n");
        assert_eq!(config.repos, ["extra", "core", "extra"]);
    }

    #[test]
    fn test_derived_paths() {
        let config = parse("DBPath = /srv/db/");
        assert_eq!(config.sync_db("core"), Path::new("/srv/db/sync/core.db"));
        assert_eq!(config.local_dir(), Path::new("/srv/db/local"));
    }

    #[test]
    fn test_read_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("pacman.conf");
        std::fs::write(&path, ARCH_CONF).unwrap();
        let config = RepositoryConfig::read(&path).unwrap();
        assert_eq!(config.repos, ["core", "extra", "multilib"]);
        assert_eq!(config.conf_path, path);
    }

    #[test]
    fn test_read_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("pacman.conf");
        let err = RepositoryConfig::read(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::ConfigPath(path));
    }

    #[test]
    fn test_read_directory() {
        let temp = tempfile::tempdir().unwrap();
        let err = RepositoryConfig::read(temp.path()).unwrap_err();
        assert_eq!(*err, ErrorKind::ConfigPath(temp.path().to_path_buf()));
    }

    #[rstest]
    #[case("  a   b\t c  ", "a b c")]
    #[case("\r\n", "")]
    #[case("[core]\r\n", "[core]")]
    fn test_normalize_space(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(normalize_space(line), expected);
    }
}
