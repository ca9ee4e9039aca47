//! Push notification collaborator contract.
//!
//! The orchestrator never talks to the OS notification center itself; the
//! host supplies a [`PushRegistrar`] that wraps whatever the platform offers.

use async_trait::async_trait;

/// System-level push authorization status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAuthorization {
    /// The user granted notification authorization.
    Authorized,
    /// The user denied authorization; the system prompt cannot be shown
    /// again.
    Denied,
    /// The user has not been asked yet.
    NotDetermined,
}

/// Outcome of [`crate::SessionOrchestrator::enable_notifications`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationToggle {
    /// Registration went through and the flag is on.
    Enabled,
    /// The user declined the system prompt.
    Declined,
    /// Authorization was denied earlier; the host must deep-link the user
    /// to system settings instead of prompting.
    BlockedBySystem,
}

/// Host-side push notification registration.
#[async_trait]
pub trait PushRegistrar: Send + Sync {
    /// Current system authorization status.
    async fn authorization_status(&self) -> PushAuthorization;

    /// Prompt (when permitted) and register for push notifications.
    ///
    /// Returns whether the user granted authorization.
    async fn register(&self) -> bool;

    /// Tear down the push registration. Safe with no registration.
    async fn unregister(&self);
}
