//! A catalog of pacman packages, built from the system's sync and local
//! databases.
//!
//! Sync databases (`<DBPath>/sync/<repo>.db`) are compressed tar archives and
//! get extracted into a per-build [`Workspace`] first. The local database
//! (`<DBPath>/local`) is read in place. Every package in either is a
//! directory with a `desc` file, parsed by [`desc::parse`].
//!
//! ```no_run
//! use karun_catalog::{PackageCollection, Scope};
//! use karun_config::RepositoryConfig;
//!
//! let config = RepositoryConfig::read("/etc/pacman.conf").unwrap();
//! let collection = PackageCollection::build(Scope::All, &config, "/tmp/karun").unwrap();
//! for record in collection.catalog().out_of_sync() {
//!     println!("{} {} -> {}", record.name, record.local_version, record.repo_version);
//! }
//! collection.into_parts().1.remove().unwrap();
//! ```

mod collection;
pub mod desc;
pub mod error;
#[cfg(test)]
mod fixtures;
mod record;
mod workspace;

pub use crate::collection::{ALL_REPOSITORIES, PackageCollection, Scope};
pub use crate::record::{Catalog, PackageRecord};
pub use crate::workspace::{Extraction, Workspace};
