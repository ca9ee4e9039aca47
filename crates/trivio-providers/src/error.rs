//! Provider error types.

use crate::ProviderKind;
use thiserror::Error;

/// Error type for provider login handshakes.
///
/// Only [`ProviderError::EmailNotShared`] is meaningful to callers beyond
/// "the login failed", since it needs a grant-permission remediation instead
/// of a retry. Everything else, including user cancellation, is generic.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider completed the handshake but declined to share the
    /// account's email address.
    #[error("{0} did not share an email address for this account")]
    EmailNotShared(ProviderKind),

    /// The user dismissed the provider's login flow.
    #[error("login was cancelled")]
    Cancelled,

    /// The vendor handshake failed before a grant was issued.
    #[error("provider handshake failed: {0}")]
    Handshake(String),

    /// HTTP failure while talking to the provider.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the profile request or returned an unusable
    /// profile.
    #[error("provider profile unavailable: {0}")]
    Profile(String),
}

impl ProviderError {
    /// Whether this failure needs the grant-email remediation path.
    pub fn is_email_not_shared(&self) -> bool {
        matches!(self, ProviderError::EmailNotShared(_))
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_not_shared_is_distinguished() {
        assert!(ProviderError::EmailNotShared(ProviderKind::Facebook).is_email_not_shared());
        assert!(!ProviderError::Cancelled.is_email_not_shared());
        assert!(!ProviderError::Handshake("sdk".into()).is_email_not_shared());
    }

    #[test]
    fn test_error_messages_name_the_provider() {
        let err = ProviderError::EmailNotShared(ProviderKind::Twitter);
        assert!(err.to_string().contains("twitter"));
    }
}
