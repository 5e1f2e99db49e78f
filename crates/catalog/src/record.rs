use std::collections::HashMap;
use std::collections::hash_map::{Iter, Values};
use time::UtcDateTime;

/// Minimal representation of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PackageRecord {
    pub name: String,
    /// Sync repository the record came from; empty for packages only known
    /// to the local database.
    pub repo: String,
    pub repo_version: String,
    /// Installed version; empty if not installed.
    pub local_version: String,
    pub description: String,
}

impl PackageRecord {
    pub fn is_installed(&self) -> bool {
        !self.local_version.is_empty()
    }

    /// Installed, but not available from any processed repository.
    pub fn is_local_only(&self) -> bool {
        self.repo.is_empty()
    }

    /// Installed version differs from the repository's. No `vercmp` here:
    /// a locally built newer package counts too.
    pub fn is_out_of_sync(&self) -> bool {
        self.is_installed() && !self.is_local_only() && self.local_version != self.repo_version
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// Package records keyed by name.
///
/// Only a catalog build can add or change records; once handed out a
/// catalog is a read-only snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: HashMap<String, PackageRecord>,
    built_at: Option<UtcDateTime>,
}

impl Catalog {
    /// Inserts `record`, replacing any record with the same name.
    pub(crate) fn insert(&mut self, record: PackageRecord) -> Option<PackageRecord> {
        self.packages.insert(record.name.clone(), record)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut PackageRecord> {
        self.packages.get_mut(name)
    }

    pub(crate) fn seal(&mut self) {
        self.built_at = Some(UtcDateTime::now());
    }

    /// When the build that produced this catalog completed.
    pub fn built_at(&self) -> Option<UtcDateTime> {
        self.built_at
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, PackageRecord> {
        self.packages.iter()
    }

    pub fn records(&self) -> Values<'_, String, PackageRecord> {
        self.packages.values()
    }

    pub fn installed(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records().filter(|r| r.is_installed())
    }

    pub fn out_of_sync(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records().filter(|r| r.is_out_of_sync())
    }

    /// Case-insensitive substring match on name and description.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a PackageRecord> + use<'a> {
        let needle = term.to_lowercase();
        self.records().filter(move |r| r.matches(&needle))
    }

    /// Records ordered by name, for display.
    pub fn sorted(&self) -> Vec<&PackageRecord> {
        let mut records: Vec<_> = self.records().collect();
        records.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        records
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = (&'a String, &'a PackageRecord);
    type IntoIter = Iter<'a, String, PackageRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
