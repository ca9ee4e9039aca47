//! Crash-telemetry user mirror contract.

/// The identity fields mirrored into crash reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryIdentity {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// Best-effort mirror of the logged-in user into the telemetry service.
///
/// Implementations must never fail the calling workflow; errors are theirs
/// to swallow.
pub trait TelemetryMirror: Send + Sync {
    /// Attach the identity to subsequent crash reports.
    fn set_identity(&self, identity: &TelemetryIdentity);

    /// Detach any identity from subsequent crash reports.
    fn clear_identity(&self);
}
