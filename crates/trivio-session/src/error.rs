//! Session workflow error taxonomy.

use thiserror::Error;
use trivio_account::{CacheError, ExchangeError};
use trivio_keystore::StorageError;
use trivio_providers::{ProviderError, ProviderKind};

/// Error type for session workflows.
///
/// The classes matter more than the payloads: the shell branches on
/// "needs the grant-email remediation", "provider handshake failed",
/// "exchange failed", and "local persistence failed", nothing finer.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The provider declined to share the account's email address.
    #[error("{0} did not share an email address for this account")]
    EmailNotShared(ProviderKind),

    /// Provider SDK failure, user cancellation, or network failure during
    /// the provider handshake. One class; callers cannot tell them apart.
    #[error("{provider} login did not complete: {reason}")]
    ProviderFailed {
        provider: ProviderKind,
        reason: String,
    },

    /// The remote exchange rejected the request or returned unusable data.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The token store could not be read or written.
    #[error(transparent)]
    TokenStore(#[from] StorageError),

    /// The account cache could not be written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A workflow was driven from a phase it is not legal in.
    #[error("invalid session transition: {0}")]
    InvalidTransition(String),
}

/// Result type for session workflows.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Whether remediation is re-requesting the email permission from the
    /// provider rather than retrying the login.
    pub fn requires_email_permission(&self) -> bool {
        matches!(self, SessionError::EmailNotShared(_))
    }

    /// Whether a local write failed (tokens or cache).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            SessionError::TokenStore(_) | SessionError::Cache(_)
        )
    }

    /// Classify a provider handshake failure.
    ///
    /// EmailNotShared keeps its identity; everything else collapses into
    /// one generic class.
    pub(crate) fn from_provider(provider: ProviderKind, err: ProviderError) -> Self {
        match err {
            ProviderError::EmailNotShared(kind) => SessionError::EmailNotShared(kind),
            other => SessionError::ProviderFailed {
                provider,
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_not_shared_keeps_identity() {
        let err = SessionError::from_provider(
            ProviderKind::Facebook,
            ProviderError::EmailNotShared(ProviderKind::Facebook),
        );
        assert!(err.requires_email_permission());
        assert!(matches!(err, SessionError::EmailNotShared(ProviderKind::Facebook)));
    }

    #[test]
    fn test_cancellation_is_generic_provider_failure() {
        let err = SessionError::from_provider(ProviderKind::Twitter, ProviderError::Cancelled);
        assert!(!err.requires_email_permission());
        assert!(matches!(
            err,
            SessionError::ProviderFailed {
                provider: ProviderKind::Twitter,
                ..
            }
        ));
    }

    #[test]
    fn test_handshake_failure_is_generic_provider_failure() {
        let err = SessionError::from_provider(
            ProviderKind::Facebook,
            ProviderError::Handshake("sdk unavailable".into()),
        );
        match err {
            SessionError::ProviderFailed { provider, reason } => {
                assert_eq!(provider, ProviderKind::Facebook);
                assert!(reason.contains("sdk unavailable"));
            }
            other => panic!("expected provider failure, got {other:?}"),
        }
    }

    #[test]
    fn test_persistence_classification() {
        let storage: SessionError = StorageError::Platform("keychain locked".into()).into();
        assert!(storage.is_persistence());

        let exchange: SessionError =
            ExchangeError::Malformed(serde_json::from_str::<i64>("x").unwrap_err()).into();
        assert!(!exchange.is_persistence());
    }
}
