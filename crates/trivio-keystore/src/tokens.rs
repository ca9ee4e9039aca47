//! High-level token persistence over a secure storage backend.

use crate::{SecureStorage, StorageError, StorageKeys, StorageResult};
use tracing::debug;

/// The credential pair for one authenticated session.
///
/// `auth_id` is absent for provider flows where the backend does not issue a
/// separate auth record id; `access_token` is always required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Server-assigned auth record id, when the backend issued one.
    pub auth_id: Option<i64>,
    /// Opaque account API access token.
    pub access_token: String,
}

impl SessionTokens {
    /// Build a token pair from an exchange response.
    pub fn new(auth_id: Option<i64>, access_token: impl Into<String>) -> Self {
        Self {
            auth_id,
            access_token: access_token.into(),
        }
    }
}

/// Typed access to the session credential pair.
///
/// The two underlying keys always describe the same session: `store`
/// replaces both (removing a stale auth id when the new session has none)
/// and `clear` removes both even if one removal fails.
pub struct TokenStore {
    storage: Box<dyn SecureStorage>,
}

impl TokenStore {
    /// Create a new token store with the given backend.
    pub fn new(storage: Box<dyn SecureStorage>) -> Self {
        Self { storage }
    }

    /// Persist the credential pair, replacing any previous session's.
    pub fn store(&self, tokens: &SessionTokens) -> StorageResult<()> {
        self.storage
            .set(StorageKeys::ACCESS_TOKEN, &tokens.access_token)?;

        match tokens.auth_id {
            Some(id) => self
                .storage
                .set(StorageKeys::AUTH_ID, &id.to_string())?,
            // A leftover id from a previous session must not survive a
            // session that has none.
            None => {
                self.storage.delete(StorageKeys::AUTH_ID)?;
            }
        }

        debug!("session tokens stored");
        Ok(())
    }

    /// Load the credential pair, if a session is persisted.
    ///
    /// A missing access token means no session, regardless of any leftover
    /// auth id.
    pub fn load(&self) -> StorageResult<Option<SessionTokens>> {
        let Some(access_token) = self.storage.get(StorageKeys::ACCESS_TOKEN)? else {
            return Ok(None);
        };

        let auth_id = match self.storage.get(StorageKeys::AUTH_ID)? {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                StorageError::Encoding(format!("stored auth id is not an integer: {raw:?}"))
            })?),
            None => None,
        };

        Ok(Some(SessionTokens {
            auth_id,
            access_token,
        }))
    }

    /// Remove both credentials.
    ///
    /// Both removals are attempted even if the first fails; the first
    /// failure is reported after both ran. Missing keys are not errors.
    pub fn clear(&self) -> StorageResult<()> {
        let token_result = self.storage.delete(StorageKeys::ACCESS_TOKEN);
        let id_result = self.storage.delete(StorageKeys::AUTH_ID);

        token_result?;
        id_result?;

        debug!("session tokens cleared");
        Ok(())
    }

    /// Check whether a session token is persisted.
    pub fn has_tokens(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }
}
