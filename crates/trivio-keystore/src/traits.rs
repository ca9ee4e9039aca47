//! Storage trait definitions.

use crate::StorageResult;

/// Trait for secure storage backends.
///
/// Backends must keep values confidential (platform keychain or equivalent)
/// and durable across process restarts.
pub trait SecureStorage: Send + Sync {
    /// Store a value securely, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value. Returns whether a value existed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists.
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
