//! Account session orchestration.
//!
//! This crate ties the token store, the account cache, the provider
//! adapters, and the account service exchange together behind a single
//! [`SessionOrchestrator`]. The orchestrator runs every login, logout,
//! registration, restore, and notification workflow, keeps the internal
//! session state machine honest, and publishes the [`AccountState`] triple
//! that the rest of the app observes.
//!
//! Hosts construct the orchestrator once at startup with their platform
//! collaborators and call [`SessionOrchestrator::restore`] before showing
//! any UI.

pub mod error;
pub mod notifications;
pub mod orchestrator;
pub mod session_fsm;
pub mod state;
pub mod telemetry;

pub use error::{SessionError, SessionResult};
pub use notifications::{NotificationToggle, PushAuthorization, PushRegistrar};
pub use orchestrator::{SessionOrchestrator, UnlinkOutcome};
pub use session_fsm::{
    SessionMachine, SessionMachineInput, SessionMachineState, SessionPhase,
};
pub use state::{AccountState, AccountStateCallback, SharedAccountState};
pub use telemetry::{TelemetryIdentity, TelemetryMirror};
