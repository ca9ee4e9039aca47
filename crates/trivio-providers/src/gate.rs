//! The host-driven half of a provider login.

use crate::{ProviderKind, ProviderResult};
use async_trait::async_trait;

/// A short-lived bearer credential produced by one vendor login flow.
#[derive(Clone)]
pub struct ProviderGrant {
    pub access_token: String,
}

impl ProviderGrant {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Runs the interactive part of a provider login.
///
/// The host application implements this by driving the vendor SDK or a
/// system browser session; the adapters only consume the resulting grant.
/// A dismissed dialog surfaces as [`crate::ProviderError::Cancelled`], any
/// other vendor-side failure as [`crate::ProviderError::Handshake`].
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Run the vendor's login flow for `provider` and return its grant.
    async fn authorize(&self, provider: ProviderKind) -> ProviderResult<ProviderGrant>;
}
