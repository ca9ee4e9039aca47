//! The provider adapter contract.

use crate::{ProviderKind, ProviderResult, SocialIdentity};
use async_trait::async_trait;

/// A social identity provider, normalized to one contract.
///
/// Implementations hold whatever session the vendor hands them between
/// `begin_login` and `invalidate_session`. The session workflow invalidates
/// an adapter whose login failed, so a half-authenticated vendor session
/// never outlives the attempt that created it.
#[async_trait]
pub trait SocialProvider: Send + Sync {
    /// Which provider this adapter fronts.
    fn kind(&self) -> ProviderKind;

    /// Run the provider's login flow and normalize the outcome.
    ///
    /// An account whose email the provider withheld is reported as
    /// [`crate::ProviderError::EmailNotShared`]; every other failure mode
    /// (cancellation, vendor errors, network) is generic.
    async fn begin_login(&self) -> ProviderResult<SocialIdentity>;

    /// Drop any session held with the provider.
    ///
    /// Idempotent and safe to call when no session exists; never fails.
    async fn invalidate_session(&self);
}
