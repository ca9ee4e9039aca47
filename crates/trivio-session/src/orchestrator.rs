//! The session orchestrator.
//!
//! Every login, registration, logout, unlink, and notification workflow runs
//! through here. The orchestrator is the only writer of the token store, the
//! account cache, and the published [`AccountState`], and it is the single
//! place where "is the user logged in, and through which provider" is
//! decided.
//!
//! Commit order for every login shape: persist tokens, write the cache
//! document, then publish the state triple. The published flag never flips
//! before both stores are durable.

use crate::error::{SessionError, SessionResult};
use crate::notifications::{NotificationToggle, PushAuthorization, PushRegistrar};
use crate::session_fsm::{SessionMachine, SessionMachineInput, SessionPhase};
use crate::state::{AccountState, SharedAccountState};
use crate::telemetry::{TelemetryIdentity, TelemetryMirror};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use trivio_account::{
    AccountCache, AccountExchange, AccountRecord, ActiveProvider, CachedAccount,
    RegistrationRequest,
};
use trivio_keystore::{SessionTokens, TokenStore};
use trivio_providers::{ProviderKind, ProviderRegistry};

/// Outcome of [`SessionOrchestrator::unlink_provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// The provider is the active one; nothing was changed. Call again with
    /// `confirm_logout = true` to proceed with the full logout.
    ConfirmationRequired,
    /// The provider was the active one and the whole session was torn down.
    LoggedOut,
    /// A non-active provider's vendor session was invalidated; the local
    /// session was not touched.
    Unlinked,
}

/// Drives the account session workflows over explicitly injected
/// collaborators.
///
/// Constructed once at the process root. All methods take `&self`; the
/// orchestrator serializes authentication workflows internally, so handles
/// can be shared freely (e.g. behind an `Arc`).
pub struct SessionOrchestrator {
    tokens: TokenStore,
    cache: Arc<dyn AccountCache>,
    exchange: Arc<dyn AccountExchange>,
    providers: ProviderRegistry,
    push: Arc<dyn PushRegistrar>,
    telemetry: Arc<dyn TelemetryMirror>,
    state: SharedAccountState,
    /// Internal FSM guarding workflow legality.
    fsm: Mutex<SessionMachine>,
    /// Serializes authentication workflows; held across every suspend point
    /// of a workflow so a later attempt's publication is authoritative.
    workflow: tokio::sync::Mutex<()>,
    /// IANA timezone id reported to the profile endpoint after commits.
    device_timezone: String,
}

impl SessionOrchestrator {
    pub fn new(
        tokens: TokenStore,
        cache: Arc<dyn AccountCache>,
        exchange: Arc<dyn AccountExchange>,
        providers: ProviderRegistry,
        push: Arc<dyn PushRegistrar>,
        telemetry: Arc<dyn TelemetryMirror>,
        state: SharedAccountState,
        device_timezone: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            cache,
            exchange,
            providers,
            push,
            telemetry,
            state,
            fsm: Mutex::new(SessionMachine::new()),
            workflow: tokio::sync::Mutex::new(()),
            device_timezone: device_timezone.into(),
        }
    }

    /// Snapshot of the published state triple.
    pub fn account_state(&self) -> AccountState {
        self.state.snapshot()
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        let fsm = self.fsm.lock().unwrap();
        SessionPhase::from(fsm.state())
    }

    /// The cached account record, when logged in.
    pub fn current_account(&self) -> Option<AccountRecord> {
        if !self.state.snapshot().is_logged_in {
            return None;
        }
        self.cache.load().ok().flatten().map(|cached| cached.record)
    }

    /// Transition the FSM, logging phase changes.
    fn transition(&self, input: &SessionMachineInput) -> SessionResult<SessionPhase> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_phase = SessionPhase::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            SessionError::InvalidTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_phase = SessionPhase::from(fsm.state());
        drop(fsm);

        if old_phase != new_phase {
            debug!(old_phase = ?old_phase, new_phase = ?new_phase, "Session phase transition");
        }

        Ok(new_phase)
    }

    /// Log in through a social provider.
    ///
    /// Runs the provider handshake, exchanges the identity with the account
    /// service, backfills a missing avatar from the provider profile, and
    /// commits. A handshake failure invalidates the provider's session
    /// before it is reported, so a half-authenticated vendor session never
    /// lingers. A failure anywhere before persistence leaves a prior
    /// session untouched.
    pub async fn login_with_provider(
        &self,
        provider: ProviderKind,
    ) -> SessionResult<AccountRecord> {
        let _guard = self.workflow.lock().await;
        let had_session = self.phase().is_authenticated();

        self.transition(&SessionMachineInput::LoginRequested)?;
        info!(provider = %provider, "Provider login started");

        let adapter = self.providers.adapter(provider);
        let identity = match adapter.begin_login().await {
            Ok(identity) => identity,
            Err(err) => {
                adapter.invalidate_session().await;
                self.abort_login(had_session);
                return Err(SessionError::from_provider(provider, err));
            }
        };

        let envelope = match self.exchange.login_social(&identity).await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.abort_login(had_session);
                return Err(SessionError::Exchange(err));
            }
        };

        let (mut record, tokens) = envelope.into_parts();
        if record.avatar_url.is_none() {
            record.avatar_url = identity.avatar_url.clone();
        }

        let record = self
            .commit_session(record, tokens, ActiveProvider::from(provider))
            .await?;
        info!(provider = %provider, user_id = record.user_id, "Provider login committed");
        Ok(record)
    }

    /// Log in with native credentials.
    pub async fn login_with_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> SessionResult<AccountRecord> {
        let _guard = self.workflow.lock().await;
        let had_session = self.phase().is_authenticated();

        self.transition(&SessionMachineInput::LoginRequested)?;
        info!("Credentials login started");

        let envelope = match self.exchange.login_native(username, password).await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.abort_login(had_session);
                return Err(SessionError::Exchange(err));
            }
        };

        let (record, tokens) = envelope.into_parts();
        let record = self
            .commit_session(record, tokens, ActiveProvider::Native)
            .await?;
        info!(user_id = record.user_id, "Credentials login committed");
        Ok(record)
    }

    /// Create a native account and log into it.
    ///
    /// The committed record carries `is_new_user = true` for exactly this
    /// session; later logins come back with the flag off.
    pub async fn register_with_credentials(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> SessionResult<AccountRecord> {
        let _guard = self.workflow.lock().await;
        let had_session = self.phase().is_authenticated();

        self.transition(&SessionMachineInput::LoginRequested)?;
        info!("Registration started");

        let request = RegistrationRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            timezone_id: self.device_timezone.clone(),
        };

        let envelope = match self.exchange.register_native(&request).await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.abort_login(had_session);
                return Err(SessionError::Exchange(err));
            }
        };

        let (mut record, tokens) = envelope.into_parts();
        record.is_new_user = true;

        let record = self
            .commit_session(record, tokens, ActiveProvider::Native)
            .await?;
        info!(user_id = record.user_id, "Registration committed");
        Ok(record)
    }

    /// Commit a session: tokens, then cache, then the published flag.
    ///
    /// Any persistence failure scrubs both stores back to a coherent
    /// logged-out baseline so a cached record can never outlive its tokens.
    async fn commit_session(
        &self,
        record: AccountRecord,
        tokens: SessionTokens,
        provider: ActiveProvider,
    ) -> SessionResult<AccountRecord> {
        if let Err(err) = self.tokens.store(&tokens) {
            warn!(error = %err, "Token write failed; scrubbing");
            self.scrub_after_failed_commit();
            return Err(SessionError::TokenStore(err));
        }

        let cached = CachedAccount::new(record, provider);
        if let Err(err) = self.cache.save(&cached) {
            warn!(error = %err, "Cache write failed; scrubbing");
            self.scrub_after_failed_commit();
            return Err(SessionError::Cache(err));
        }

        self.transition(&SessionMachineInput::LoginSucceeded)?;
        self.state.publish_login(provider);

        let record = cached.record;
        self.telemetry.set_identity(&TelemetryIdentity {
            user_id: record.user_id,
            email: record.email.clone(),
            name: record.full_name.clone(),
        });

        // Post-commit profile maintenance; a failure here never fails the
        // login
        if let Err(err) = self
            .exchange
            .update_timezone(record.user_id, &tokens.access_token, &self.device_timezone)
            .await
        {
            warn!(error = %err, "Timezone sync after login failed");
        }

        Ok(record)
    }

    /// Resolve a failed attempt, re-entering LoggedIn when a prior session
    /// survived it.
    fn abort_login(&self, had_session: bool) {
        let input = if had_session {
            SessionMachineInput::LoginFailedSessionKept
        } else {
            SessionMachineInput::LoginFailed
        };
        let _ = self.transition(&input);
    }

    /// Drop both stores and publish the reset triple after a partial commit.
    fn scrub_after_failed_commit(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "Token scrub after failed commit also failed");
        }
        if let Err(err) = self.cache.delete() {
            warn!(error = %err, "Cache scrub after failed commit also failed");
        }

        let notifications = self.state.snapshot().is_notification_authorized;
        self.state.publish(AccountState {
            is_logged_in: false,
            active_provider: ActiveProvider::None,
            is_notification_authorized: notifications,
        });

        let _ = self.transition(&SessionMachineInput::LoginFailed);
    }

    /// Unconditional logout sweep.
    ///
    /// Never errors: every sub-step treats missing state as success, and
    /// failures are logged and skipped. Tokens and the cached record are
    /// deleted, the state triple is reset, both provider sessions are
    /// invalidated regardless of which one was active, push notifications
    /// are unregistered, and the telemetry identity is cleared.
    pub async fn logout(&self) {
        let _guard = self.workflow.lock().await;
        self.logout_inner().await;
    }

    /// The logout sweep body, for callers already holding the workflow lock.
    async fn logout_inner(&self) {
        // Tolerate being called with no session
        let _ = self.transition(&SessionMachineInput::LogoutRequested);

        info!("Logout sweep started");

        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "Token clear failed during logout");
        }
        if let Err(err) = self.cache.delete() {
            warn!(error = %err, "Cache delete failed during logout");
        }

        self.state.publish(AccountState::logged_out());

        for adapter in self.providers.all() {
            adapter.invalidate_session().await;
        }

        self.push.unregister().await;
        self.telemetry.clear_identity();

        let _ = self.transition(&SessionMachineInput::LogoutCompleted);

        info!("Logout sweep finished");
    }

    /// Unlink a provider, or log out when it carries the current session.
    ///
    /// Disabling the active provider orphans the whole session, so it
    /// requires `confirm_logout = true` and is then behaviorally a
    /// [`SessionOrchestrator::logout`]. Disabling a non-active provider
    /// invalidates only that provider's vendor session.
    pub async fn unlink_provider(
        &self,
        provider: ProviderKind,
        confirm_logout: bool,
    ) -> UnlinkOutcome {
        let _guard = self.workflow.lock().await;

        let active = self.state.snapshot().active_provider;
        if active == ActiveProvider::from(provider) {
            if !confirm_logout {
                debug!(provider = %provider, "Unlink of the active provider needs confirmation");
                return UnlinkOutcome::ConfirmationRequired;
            }

            self.logout_inner().await;
            return UnlinkOutcome::LoggedOut;
        }

        self.providers.adapter(provider).invalidate_session().await;
        info!(provider = %provider, "Provider session invalidated without logout");
        UnlinkOutcome::Unlinked
    }

    /// Rebuild the published state from the durable tiers at process start.
    ///
    /// A coherent tokens+record pair republishes the logged-in triple and
    /// re-arms the telemetry mirror; a half-present pair is scrubbed and
    /// resolves to logged out, because an interrupted login never committed
    /// anything. Cache read errors are tolerated as an absent record; token
    /// store read errors propagate, since they usually mean the platform
    /// keystore is unavailable rather than empty.
    pub async fn restore(&self) -> SessionResult<Option<AccountRecord>> {
        let _guard = self.workflow.lock().await;

        if self.phase().is_authenticated() {
            return Ok(self.current_account());
        }

        let tokens = self.tokens.load()?;

        let cached = match self.cache.load() {
            Ok(cached) => cached,
            Err(err) => {
                warn!(error = %err, "Account cache unreadable during restore");
                None
            }
        };

        match (tokens, cached) {
            (Some(_tokens), Some(cached)) => {
                let authorized =
                    self.push.authorization_status().await == PushAuthorization::Authorized;

                self.transition(&SessionMachineInput::RestoreSucceeded)?;
                self.state.publish(AccountState {
                    is_logged_in: true,
                    active_provider: cached.provider,
                    is_notification_authorized: authorized,
                });

                self.telemetry.set_identity(&TelemetryIdentity {
                    user_id: cached.record.user_id,
                    email: cached.record.email.clone(),
                    name: cached.record.full_name.clone(),
                });

                info!(
                    user_id = cached.record.user_id,
                    provider = %cached.provider,
                    "Session restored"
                );
                Ok(Some(cached.record))
            }
            (None, None) => {
                debug!("No persisted session to restore");
                Ok(None)
            }
            (tokens, cached) => {
                // Half a session is no session; scrub the surviving half
                warn!(
                    tokens_present = tokens.is_some(),
                    record_present = cached.is_some(),
                    "Incoherent persisted session scrubbed"
                );
                if let Err(err) = self.tokens.clear() {
                    warn!(error = %err, "Token scrub during restore failed");
                }
                if let Err(err) = self.cache.delete() {
                    warn!(error = %err, "Cache scrub during restore failed");
                }
                Ok(None)
            }
        }
    }

    /// Query the push collaborator and republish the notification flag.
    ///
    /// Explicit entry point for the host lifecycle to call on foreground
    /// transitions.
    pub async fn refresh_notification_authorization(&self) -> PushAuthorization {
        let status = self.push.authorization_status().await;
        self.state
            .set_notification_authorized(status == PushAuthorization::Authorized);
        debug!(status = ?status, "Notification authorization refreshed");
        status
    }

    /// Walk the enable-notifications flow.
    ///
    /// When the system already denied authorization the prompt cannot be
    /// shown again; the host must deep-link the user to system settings.
    pub async fn enable_notifications(&self) -> NotificationToggle {
        match self.push.authorization_status().await {
            PushAuthorization::Denied => {
                self.state.set_notification_authorized(false);
                NotificationToggle::BlockedBySystem
            }
            PushAuthorization::Authorized | PushAuthorization::NotDetermined => {
                let granted = self.push.register().await;
                self.state.set_notification_authorized(granted);

                if granted {
                    info!("Notifications enabled");
                    NotificationToggle::Enabled
                } else {
                    NotificationToggle::Declined
                }
            }
        }
    }

    /// Unregister push notifications and drop the flag.
    pub async fn disable_notifications(&self) {
        self.push.unregister().await;
        self.state.set_notification_authorized(false);
        info!("Notifications disabled");
    }

    /// Fire-and-forget upload of the device push token for the current
    /// session. No-op when logged out; failures are logged and swallowed.
    pub async fn submit_push_token(&self, push_token: &str) {
        if !self.state.snapshot().is_logged_in {
            debug!("Push token ignored with no session");
            return;
        }

        let tokens = match self.tokens.load() {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                debug!("Push token ignored with no stored tokens");
                return;
            }
            Err(err) => {
                warn!(error = %err, "Token load failed for push token upload");
                return;
            }
        };

        let record = match self.cache.load() {
            Ok(Some(cached)) => cached.record,
            _ => {
                debug!("Push token ignored with no cached record");
                return;
            }
        };

        if let Err(err) = self
            .exchange
            .update_push_token(record.user_id, &tokens.access_token, push_token)
            .await
        {
            warn!(error = %err, "Push token upload failed");
        }
    }
}
