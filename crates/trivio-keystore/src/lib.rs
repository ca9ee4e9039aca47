//! Secure credential storage for the Trivio client.
//!
//! This crate provides platform-specific secure storage implementations:
//! - **macOS**: Keychain Access via `security-framework`
//! - **Linux**: Secret Service (GNOME Keyring / KWallet) via `secret-service`
//!
//! plus an in-memory backend for tests and simulator hosts, and the
//! [`TokenStore`] facade that persists the session credential pair.

mod keys;
mod memory;
mod tokens;
mod traits;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
mod linux;

pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use tokens::{SessionTokens, TokenStore};
pub use traits::SecureStorage;

use thiserror::Error;

/// Service name used for all storage operations.
pub const SERVICE_NAME: &str = "app.trivio.client";

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Platform-specific storage error
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default platform-specific storage implementation.
pub fn create_storage() -> StorageResult<Box<dyn SecureStorage>> {
    #[cfg(target_os = "macos")]
    {
        let storage = macos::KeychainStorage::new(SERVICE_NAME)?;
        Ok(Box::new(storage))
    }

    #[cfg(target_os = "linux")]
    {
        let storage = linux::SecretServiceStorage::new(SERVICE_NAME)?;
        Ok(Box::new(storage))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        Err(StorageError::Platform(
            "No secure storage implementation available for this platform".to_string(),
        ))
    }
}

/// Create a TokenStore with the default platform storage.
pub fn create_token_store() -> StorageResult<TokenStore> {
    let storage = create_storage()?;
    Ok(TokenStore::new(storage))
}
