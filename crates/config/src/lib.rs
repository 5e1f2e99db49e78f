//! Configuration for karun.
//!
//! Two unrelated files feed a catalog build:
//!
//! - **pacman.conf**, owned by the package manager. Only the repository
//!   section names, `DBPath` and `CacheDir` matter here; see
//!   [`RepositoryConfig`]. [`ConfigCache`] shares a parsed copy between
//!   builds without turning it into an implicit global.
//! - **karun's own [`Settings`]**: where pacman.conf lives, where temporary
//!   workspaces go. Layered defaults, TOML files and `KARUN_*` environment
//!   variables via `figment`.

mod cache;
pub mod error;
mod pacman;
mod settings;

pub use crate::cache::ConfigCache;
pub use crate::pacman::{DEFAULT_CACHE_DIR, DEFAULT_CONF_PATH, DEFAULT_DB_PATH, RepositoryConfig};
pub use crate::settings::Settings;
