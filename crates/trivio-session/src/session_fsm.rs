//! Session state machine using rust-fsm.
//!
//! This module defines an explicit finite state machine for the account
//! session, replacing implicit state derivation from storage checks.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │    LoggedOut    │ (initial)
//! └────────┬────────┘
//!          │ LoginRequested          RestoreSucceeded
//!          ▼                                │
//! ┌─────────────────┐                       │
//! │ Authenticating  │                       │
//! └────────┬────────┘                       │
//!          │ LoginSucceeded /               │
//!          │ LoginFailedSessionKept         │
//!          ▼                                ▼
//! ┌─────────────────┐ ◄─────────────────────┘
//! │    LoggedIn     │ ──── LoginRequested ──► Authenticating
//! └────────┬────────┘      (re-login; old session replaced on success)
//!          │ LogoutRequested
//!          ▼
//! ┌─────────────────┐
//! │   LoggingOut    │
//! └────────┬────────┘
//!          │ LogoutCompleted
//!          ▼
//!      LoggedOut
//!
//! Authenticating ── LoginFailed ──► LoggedOut
//! ```
//!
//! `Authenticating` and `LoggingOut` are never persisted: process death in
//! either resolves to whatever the durable tiers say at next start, which for
//! an uncommitted login is LoggedOut. A failed re-login whose prior session
//! survived re-enters `LoggedIn` through `LoginFailedSessionKept` rather than
//! falling to `LoggedOut`.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(LoggedOut)

    LoggedOut => {
        LoginRequested => Authenticating,
        // A coherent tokens+record pair found at process start
        RestoreSucceeded => LoggedIn
    },
    Authenticating => {
        LoginSucceeded => LoggedIn,
        LoginFailed => LoggedOut,
        // The attempt failed before touching persistence and a prior
        // session is still intact
        LoginFailedSessionKept => LoggedIn
    },
    LoggedIn => {
        LoginRequested => Authenticating,
        LogoutRequested => LoggingOut
    },
    LoggingOut => {
        LogoutCompleted => LoggedOut
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// User-friendly session phase for external consumption.
///
/// This is a simplified view of the FSM state for shell/UI purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session.
    LoggedOut,
    /// A login or registration workflow is in flight.
    Authenticating,
    /// Logged in with a committed session.
    LoggedIn,
    /// A logout sweep is in flight.
    LoggingOut,
}

impl SessionPhase {
    /// Returns true if the user has a committed session (LoggedIn only).
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::LoggedIn)
    }

    /// Returns true if the phase is a transient/in-progress phase.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionPhase::Authenticating | SessionPhase::LoggingOut)
    }
}

impl From<&SessionMachineState> for SessionPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::LoggedOut => SessionPhase::LoggedOut,
            SessionMachineState::Authenticating => SessionPhase::Authenticating,
            SessionMachineState::LoggedIn => SessionPhase::LoggedIn,
            SessionMachineState::LoggingOut => SessionPhase::LoggingOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_logged_out() {
        let machine = SessionMachine::new();
        assert_eq!(*machine.state(), SessionMachineState::LoggedOut);
    }

    #[test]
    fn test_login_flow() {
        let mut machine = SessionMachine::new();

        let result = machine.consume(&SessionMachineInput::LoginRequested);
        assert!(result.is_ok());
        assert_eq!(*machine.state(), SessionMachineState::Authenticating);

        let result = machine.consume(&SessionMachineInput::LoginSucceeded);
        assert!(result.is_ok());
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);
    }

    #[test]
    fn test_login_failure_returns_to_logged_out() {
        let mut machine = SessionMachine::new();

        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticating);

        machine.consume(&SessionMachineInput::LoginFailed).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedOut);
    }

    #[test]
    fn test_failed_relogin_keeps_prior_session() {
        let mut machine = SessionMachine::new();

        // Establish a session
        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        machine.consume(&SessionMachineInput::LoginSucceeded).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);

        // Re-login attempt fails before persistence
        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticating);

        machine
            .consume(&SessionMachineInput::LoginFailedSessionKept)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);
    }

    #[test]
    fn test_restore_flow() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::RestoreSucceeded)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);
    }

    #[test]
    fn test_logout_flow() {
        let mut machine = SessionMachine::new();

        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        machine.consume(&SessionMachineInput::LoginSucceeded).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);

        machine.consume(&SessionMachineInput::LogoutRequested).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggingOut);

        machine.consume(&SessionMachineInput::LogoutCompleted).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedOut);
    }

    #[test]
    fn test_relogin_from_logged_in() {
        let mut machine = SessionMachine::new();

        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        machine.consume(&SessionMachineInput::LoginSucceeded).unwrap();

        // Re-login replaces the session on success
        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticating);

        machine.consume(&SessionMachineInput::LoginSucceeded).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggedIn);
    }

    #[test]
    fn test_invalid_transition_returns_error() {
        let mut machine = SessionMachine::new();

        // Can't logout from LoggedOut
        let result = machine.consume(&SessionMachineInput::LogoutRequested);
        assert!(result.is_err());

        // Can't claim LoginSucceeded from LoggedOut
        let result = machine.consume(&SessionMachineInput::LoginSucceeded);
        assert!(result.is_err());

        // Can't keep a session that was never established
        machine.consume(&SessionMachineInput::LoginRequested).unwrap();
        machine.consume(&SessionMachineInput::LoginFailed).unwrap();
        let result = machine.consume(&SessionMachineInput::LogoutCompleted);
        assert!(result.is_err());
    }

    #[test]
    fn test_phase_conversion() {
        assert_eq!(
            SessionPhase::from(&SessionMachineState::LoggedOut),
            SessionPhase::LoggedOut
        );
        assert_eq!(
            SessionPhase::from(&SessionMachineState::Authenticating),
            SessionPhase::Authenticating
        );
        assert_eq!(
            SessionPhase::from(&SessionMachineState::LoggedIn),
            SessionPhase::LoggedIn
        );
        assert_eq!(
            SessionPhase::from(&SessionMachineState::LoggingOut),
            SessionPhase::LoggingOut
        );
    }

    #[test]
    fn test_phase_is_authenticated() {
        assert!(!SessionPhase::LoggedOut.is_authenticated());
        assert!(!SessionPhase::Authenticating.is_authenticated());
        assert!(SessionPhase::LoggedIn.is_authenticated());
        assert!(!SessionPhase::LoggingOut.is_authenticated());
    }

    #[test]
    fn test_phase_is_transient() {
        assert!(!SessionPhase::LoggedOut.is_transient());
        assert!(SessionPhase::Authenticating.is_transient());
        assert!(!SessionPhase::LoggedIn.is_transient());
        assert!(SessionPhase::LoggingOut.is_transient());
    }
}
