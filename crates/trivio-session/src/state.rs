//! Shared account state published by the session orchestrator.
//!
//! The triple {is_logged_in, active_provider, is_notification_authorized} is
//! a cheap synchronous mirror of the durable tiers. It is swapped wholesale
//! under one write lock, so readers never observe a mixed combination, and it
//! is mutated only from inside this crate.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;
use trivio_account::ActiveProvider;

/// The flags every screen can read synchronously.
///
/// `is_logged_in` is true iff both the token store and the account cache hold
/// a committed session. `active_provider` is meaningful only while logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub is_logged_in: bool,
    pub active_provider: ActiveProvider,
    pub is_notification_authorized: bool,
}

impl AccountState {
    /// The reset triple: not logged in, no provider, notifications off.
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            active_provider: ActiveProvider::None,
            is_notification_authorized: false,
        }
    }
}

impl Default for AccountState {
    fn default() -> Self {
        Self::logged_out()
    }
}

/// Callback type for account state change notifications.
pub type AccountStateCallback = Box<dyn Fn(AccountState) + Send + Sync>;

struct StateInner {
    state: RwLock<AccountState>,
    callback: Mutex<Option<AccountStateCallback>>,
}

/// Handle to the published account state.
///
/// Clones share one cell; the process root constructs it and passes handles
/// to the orchestrator and to whatever shell code wants to read or observe.
#[derive(Clone)]
pub struct SharedAccountState {
    inner: Arc<StateInner>,
}

impl SharedAccountState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StateInner {
                state: RwLock::new(AccountState::logged_out()),
                callback: Mutex::new(None),
            }),
        }
    }

    /// Read the current triple.
    pub fn snapshot(&self) -> AccountState {
        *self.inner.state.read().unwrap()
    }

    /// Set a callback to be notified whenever the published triple changes.
    ///
    /// The callback receives the complete new triple. It is not invoked for
    /// publications that leave the triple unchanged.
    pub fn set_on_change(&self, callback: AccountStateCallback) {
        let mut cb = self.inner.callback.lock().unwrap();
        *cb = Some(callback);
    }

    /// Publish a new triple wholesale. Notifies only on actual change.
    pub(crate) fn publish(&self, next: AccountState) {
        let previous = {
            let mut guard = self.inner.state.write().unwrap();
            std::mem::replace(&mut *guard, next)
        };

        if previous != next {
            debug!(
                is_logged_in = next.is_logged_in,
                active_provider = %next.active_provider,
                is_notification_authorized = next.is_notification_authorized,
                "Account state published"
            );
            self.notify(next);
        }
    }

    /// Publish a committed login, keeping the notification flag as it is.
    pub(crate) fn publish_login(&self, provider: ActiveProvider) {
        let (previous, next) = {
            let mut guard = self.inner.state.write().unwrap();
            let previous = *guard;
            guard.is_logged_in = true;
            guard.active_provider = provider;
            (previous, *guard)
        };

        if previous != next {
            debug!(active_provider = %provider, "Login published");
            self.notify(next);
        }
    }

    /// Republish with only the notification flag changed.
    pub(crate) fn set_notification_authorized(&self, authorized: bool) {
        let (previous, next) = {
            let mut guard = self.inner.state.write().unwrap();
            let previous = *guard;
            guard.is_notification_authorized = authorized;
            (previous, *guard)
        };

        if previous != next {
            debug!(is_notification_authorized = authorized, "Notification flag published");
            self.notify(next);
        }
    }

    fn notify(&self, state: AccountState) {
        let cb = self.inner.callback.lock().unwrap();
        if let Some(callback) = cb.as_ref() {
            callback(state);
        }
    }
}

impl Default for SharedAccountState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initial_snapshot_is_logged_out() {
        let state = SharedAccountState::new();
        assert_eq!(state.snapshot(), AccountState::logged_out());
    }

    #[test]
    fn test_publish_replaces_whole_triple() {
        let state = SharedAccountState::new();

        state.publish(AccountState {
            is_logged_in: true,
            active_provider: ActiveProvider::Twitter,
            is_notification_authorized: true,
        });

        let snapshot = state.snapshot();
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.active_provider, ActiveProvider::Twitter);
        assert!(snapshot.is_notification_authorized);
    }

    #[test]
    fn test_clones_share_one_cell() {
        let state = SharedAccountState::new();
        let observer = state.clone();

        state.publish(AccountState {
            is_logged_in: true,
            active_provider: ActiveProvider::Native,
            is_notification_authorized: false,
        });

        assert!(observer.snapshot().is_logged_in);
        assert_eq!(observer.snapshot().active_provider, ActiveProvider::Native);
    }

    #[test]
    fn test_callback_receives_complete_triple() {
        let state = SharedAccountState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        state.set_on_change(Box::new(move |next| {
            seen_clone.lock().unwrap().push(next);
        }));

        let published = AccountState {
            is_logged_in: true,
            active_provider: ActiveProvider::Facebook,
            is_notification_authorized: true,
        };
        state.publish(published);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[published]);
    }

    #[test]
    fn test_callback_skipped_when_unchanged() {
        let state = SharedAccountState::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        state.set_on_change(Box::new(move |_next| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        state.publish(AccountState::logged_out());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        state.publish(AccountState {
            is_logged_in: true,
            active_provider: ActiveProvider::Native,
            is_notification_authorized: false,
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_publish_login_keeps_notification_flag() {
        let state = SharedAccountState::new();
        state.set_notification_authorized(true);

        state.publish_login(ActiveProvider::Native);

        let snapshot = state.snapshot();
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.active_provider, ActiveProvider::Native);
        assert!(snapshot.is_notification_authorized);
    }

    #[test]
    fn test_notification_flag_update_keeps_login_fields() {
        let state = SharedAccountState::new();

        state.publish(AccountState {
            is_logged_in: true,
            active_provider: ActiveProvider::Facebook,
            is_notification_authorized: false,
        });

        state.set_notification_authorized(true);

        let snapshot = state.snapshot();
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.active_provider, ActiveProvider::Facebook);
        assert!(snapshot.is_notification_authorized);
    }
}
