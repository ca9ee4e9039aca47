//! The remote exchange contract: proven identity in, session out.

use crate::AccountRecord;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use trivio_keystore::SessionTokens;
use trivio_providers::SocialIdentity;

/// Error type for exchange calls.
///
/// Every variant is one failure class to the session workflow: the remote
/// side could not produce a usable session. A malformed response body lands
/// in the same class as a transport failure.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("exchange request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("exchange rejected: {status} ({summary})")]
    Rejected {
        status: reqwest::StatusCode,
        summary: String,
    },

    /// The service answered 2xx but the body is missing required fields.
    #[error("exchange response unusable: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Input for creating a native account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// IANA timezone id of the device, e.g. `Europe/Paris`.
    pub timezone_id: String,
}

/// The session payload every exchange endpoint returns.
///
/// Field names follow the account API's camelCase JSON. `userId`,
/// `fullName`, `email`, `points`, and `accessToken` are required; their
/// absence fails deserialization and the whole exchange with it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnvelope {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub points: u32,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub auth_id: Option<i64>,
}

impl SessionEnvelope {
    /// Split the envelope into the record to cache and the tokens to store.
    ///
    /// The record always comes back with `is_new_user = false`; only the
    /// registration workflow marks a record new.
    pub fn into_parts(self) -> (AccountRecord, SessionTokens) {
        let tokens = SessionTokens::new(self.auth_id, self.access_token);
        let record = AccountRecord {
            user_id: self.user_id,
            full_name: self.full_name,
            email: self.email,
            avatar_url: self.profile_picture_url,
            points: self.points,
            is_new_user: false,
        };
        (record, tokens)
    }
}

/// The three upsert-style session endpoints plus profile maintenance.
///
/// All three session calls are create-if-absent/log-in-if-present; the
/// remote service is the source of truth for whether the account existed.
#[async_trait]
pub trait AccountExchange: Send + Sync {
    /// Exchange a provider identity for a session.
    async fn login_social(&self, identity: &SocialIdentity) -> ExchangeResult<SessionEnvelope>;

    /// Exchange native credentials for a session.
    async fn login_native(
        &self,
        username: &str,
        password: &str,
    ) -> ExchangeResult<SessionEnvelope>;

    /// Create a native account and return its first session.
    async fn register_native(
        &self,
        request: &RegistrationRequest,
    ) -> ExchangeResult<SessionEnvelope>;

    /// Record the device timezone for the account.
    async fn update_timezone(
        &self,
        user_id: i64,
        access_token: &str,
        timezone_id: &str,
    ) -> ExchangeResult<()>;

    /// Record the device push token for the account.
    async fn update_push_token(
        &self,
        user_id: i64,
        access_token: &str,
        push_token: &str,
    ) -> ExchangeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ENVELOPE: &str = r#"{
        "userId": 7,
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "points": 120,
        "profilePictureUrl": "https://cdn.example.com/ada.jpg",
        "accessToken": "tok-xyz",
        "authId": 31
    }"#;

    #[test]
    fn test_envelope_parses_all_fields() {
        let envelope: SessionEnvelope = serde_json::from_str(FULL_ENVELOPE).unwrap();
        assert_eq!(envelope.user_id, 7);
        assert_eq!(envelope.full_name, "Ada Lovelace");
        assert_eq!(envelope.points, 120);
        assert_eq!(
            envelope.profile_picture_url.as_deref(),
            Some("https://cdn.example.com/ada.jpg")
        );
        assert_eq!(envelope.access_token, "tok-xyz");
        assert_eq!(envelope.auth_id, Some(31));
    }

    #[test]
    fn test_envelope_optional_fields_default_absent() {
        let json = r#"{
            "userId": 1,
            "fullName": "A B",
            "email": "a@x.com",
            "points": 0,
            "accessToken": "tok1"
        }"#;

        let envelope: SessionEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.profile_picture_url, None);
        assert_eq!(envelope.auth_id, None);
    }

    #[test]
    fn test_envelope_missing_access_token_fails() {
        let json = r#"{
            "userId": 1,
            "fullName": "A B",
            "email": "a@x.com",
            "points": 0
        }"#;

        assert!(serde_json::from_str::<SessionEnvelope>(json).is_err());
    }

    #[test]
    fn test_envelope_missing_user_id_fails() {
        let json = r#"{
            "fullName": "A B",
            "email": "a@x.com",
            "points": 0,
            "accessToken": "tok1"
        }"#;

        assert!(serde_json::from_str::<SessionEnvelope>(json).is_err());
    }

    #[test]
    fn test_into_parts_splits_record_and_tokens() {
        let envelope: SessionEnvelope = serde_json::from_str(FULL_ENVELOPE).unwrap();
        let (record, tokens) = envelope.into_parts();

        assert_eq!(record.user_id, 7);
        assert_eq!(record.avatar_url.as_deref(), Some("https://cdn.example.com/ada.jpg"));
        assert!(!record.is_new_user);

        assert_eq!(tokens.auth_id, Some(31));
        assert_eq!(tokens.access_token, "tok-xyz");
    }
}
