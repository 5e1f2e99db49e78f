use crate::RepositoryConfig;
use crate::error::Result;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared, lazily parsed [`RepositoryConfig`].
///
/// The first [`get`](Self::get) parses the file; later calls for the same
/// path hand out the cached copy. Asking for a different path re-parses and
/// replaces the cache, and [`invalidate`](Self::invalidate) forces the next
/// call to re-read the file. Lookups are serialised by a mutex so concurrent
/// first use parses once.
#[derive(Debug, Default)]
pub struct ConfigCache {
    inner: Mutex<Option<Arc<RepositoryConfig>>>,
}

impl ConfigCache {
    pub const fn new() -> Self {
        Self { inner: Mutex::new(None) }
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Result<Arc<RepositoryConfig>> {
        let path = path.as_ref();
        // Nothing is left half-written while the lock is held, so a poisoned
        // lock still guards a consistent value.
        let mut cached = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = cached.as_ref()
            && config.conf_path == path
        {
            return Ok(Arc::clone(config));
        }
        let config = Arc::new(RepositoryConfig::read(path)?);
        *cached = Some(Arc::clone(&config));
        Ok(config)
    }

    /// The cached configuration, if any, without touching the filesystem.
    pub fn cached(&self) -> Option<Arc<RepositoryConfig>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drops the cached configuration, returning it.
    pub fn invalidate(&self) -> Option<Arc<RepositoryConfig>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}
