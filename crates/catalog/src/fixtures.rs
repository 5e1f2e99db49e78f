//! On-disk pacman databases for tests.

use karun_compress::Compression;
use karun_config::RepositoryConfig;
use std::fs::{self, File};
use std::path::Path;
use tar::{Builder, EntryType, Header};

pub struct Package<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub desc: &'a str,
}

impl<'a> Package<'a> {
    pub fn new(name: &'a str, version: &'a str, desc: &'a str) -> Self {
        Self { name, version, desc }
    }

    fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    fn descriptor(&self) -> String {
        format!(
            "%FILENAME%\n{}-x86_64.pkg.tar.zst\n\n%NAME%\n{}\n\n%VERSION%\n{}\n\n%DESC%\n{}\n\n%ARCH%\nx86_64\n",
            self.dir_name(),
            self.name,
            self.version,
            self.desc,
        )
    }
}

/// Writes a sync database the way `repo-add` lays one out.
pub fn write_sync_db(path: &Path, format: Compression, packages: &[Package<'_>]) {
    let mut builder = Builder::new(Vec::new());
    for package in packages {
        let dir = format!("{}/", package.dir_name());
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        builder.append_data(&mut header, &dir, std::io::empty()).unwrap();

        let desc = package.descriptor();
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(0o644);
        header.set_size(desc.len() as u64);
        builder.append_data(&mut header, format!("{dir}desc"), desc.as_bytes()).unwrap();
    }
    let tar = builder.into_inner().unwrap();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    format.compress_stream(tar.as_slice(), File::create(path).unwrap()).unwrap();
}

/// Records `package` as installed in the local database under `db_path`.
pub fn install(db_path: &Path, package: &Package<'_>) {
    let dir = db_path.join("local").join(package.dir_name());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("desc"), package.descriptor()).unwrap();
}

/// A configuration listing `repos` with its databases under `db_path`.
pub fn config(db_path: &Path, repos: &[&str]) -> RepositoryConfig {
    let mut config = RepositoryConfig::new(db_path.join("pacman.conf"));
    config.db_path = db_path.to_path_buf();
    config.repos = repos.iter().map(|repo| repo.to_string()).collect();
    config
}
