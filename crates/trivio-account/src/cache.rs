//! Local cache for the account record.
//!
//! One JSON document holding the record plus the session metadata that has no
//! place inside it (which provider produced the session, and when). The
//! document is written and deleted wholesale so readers never observe a
//! partially populated record.

use crate::record::{AccountRecord, ActiveProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The document on disk is not a readable cache document.
    #[error("cache document unreadable: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// The persisted cache document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAccount {
    pub record: AccountRecord,
    /// Which provider produced the current session.
    pub provider: ActiveProvider,
    pub cached_at: DateTime<Utc>,
}

impl CachedAccount {
    pub fn new(record: AccountRecord, provider: ActiveProvider) -> Self {
        Self {
            record,
            provider,
            cached_at: Utc::now(),
        }
    }
}

/// Load-singleton/save/delete contract for the local account cache.
pub trait AccountCache: Send + Sync {
    /// Load the cached account, `None` when nothing is cached.
    fn load(&self) -> CacheResult<Option<CachedAccount>>;

    /// Replace the cached account wholesale.
    fn save(&self, cached: &CachedAccount) -> CacheResult<()>;

    /// Delete the cached account. Returns whether a document existed.
    fn delete(&self) -> CacheResult<bool>;
}

/// JSON-document cache at a fixed path, `~/.trivio/profile.json` in the
/// default layout.
pub struct FileAccountCache {
    path: PathBuf,
}

impl FileAccountCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountCache for FileAccountCache {
    fn load(&self) -> CacheResult<Option<CachedAccount>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let cached = serde_json::from_str(&contents)?;
        Ok(Some(cached))
    }

    fn save(&self, cached: &CachedAccount) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(cached)?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), user_id = cached.record.user_id, "Account record cached");
        Ok(())
    }

    fn delete(&self) -> CacheResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Account cache deleted");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory cache for tests and simulator builds.
#[derive(Default)]
pub struct MemoryAccountCache {
    slot: Mutex<Option<CachedAccount>>,
}

impl MemoryAccountCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountCache for MemoryAccountCache {
    fn load(&self) -> CacheResult<Option<CachedAccount>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, cached: &CachedAccount) -> CacheResult<()> {
        *self.slot.lock().unwrap() = Some(cached.clone());
        Ok(())
    }

    fn delete(&self) -> CacheResult<bool> {
        Ok(self.slot.lock().unwrap().take().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cached() -> CachedAccount {
        CachedAccount::new(
            AccountRecord {
                user_id: 42,
                full_name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                avatar_url: Some("https://cdn.example.com/grace.jpg".to_string()),
                points: 310,
                is_new_user: false,
            },
            ActiveProvider::Facebook,
        )
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileAccountCache::new(dir.path().join("profile.json"));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileAccountCache::new(dir.path().join("profile.json"));

        let cached = sample_cached();
        cache.save(&cached).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded, cached);
        assert_eq!(loaded.provider, ActiveProvider::Facebook);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileAccountCache::new(dir.path().join("nested/deep/profile.json"));

        cache.save(&sample_cached()).unwrap();
        assert!(cache.path().exists());
    }

    #[test]
    fn test_delete_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileAccountCache::new(dir.path().join("profile.json"));

        assert!(!cache.delete().unwrap());

        cache.save(&sample_cached()).unwrap();
        assert!(cache.delete().unwrap());
        assert!(cache.load().unwrap().is_none());
        assert!(!cache.delete().unwrap());
    }

    #[test]
    fn test_corrupt_document_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "{not json").unwrap();

        let cache = FileAccountCache::new(path);
        assert!(matches!(cache.load(), Err(CacheError::Malformed(_))));
    }

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryAccountCache::new();
        assert!(cache.load().unwrap().is_none());

        let cached = sample_cached();
        cache.save(&cached).unwrap();
        assert_eq!(cache.load().unwrap(), Some(cached));

        assert!(cache.delete().unwrap());
        assert!(cache.load().unwrap().is_none());
    }
}
