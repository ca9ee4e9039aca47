//! reqwest client for the Trivio account service.
//!
//! Three session endpoints (social create-or-login, native register, native
//! login) plus the profile-maintenance calls the session workflows fire after
//! commit. Response bodies are never logged raw; failures carry a hashed
//! summary instead.

use crate::exchange::{
    AccountExchange, ExchangeError, ExchangeResult, RegistrationRequest, SessionEnvelope,
};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use trivio_providers::SocialIdentity;

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

fn parse_envelope(text: &str) -> ExchangeResult<SessionEnvelope> {
    match serde_json::from_str(text) {
        Ok(envelope) => Ok(envelope),
        Err(err) => {
            let body_summary = summarize_response_body(text);
            tracing::warn!(body_summary = %body_summary, "Session response missing required fields");
            Err(ExchangeError::Malformed(err))
        }
    }
}

/// HTTP client for the account service.
#[derive(Clone)]
pub struct AccountApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl AccountApi {
    /// Create a client against the given service base URL,
    /// e.g. `https://api.trivio.app`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build the full URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl AccountExchange for AccountApi {
    async fn login_social(&self, identity: &SocialIdentity) -> ExchangeResult<SessionEnvelope> {
        let url = self.endpoint("auth/social");

        let mut body = serde_json::json!({
            "provider": identity.provider.as_str(),
            "providerUserId": identity.provider_user_id,
            "email": identity.email,
            "fullName": identity.full_name,
        });
        if let Some(avatar_url) = &identity.avatar_url {
            body["profilePictureUrl"] = serde_json::json!(avatar_url);
        }

        tracing::debug!(provider = %identity.provider, "Exchanging social identity for a session");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(status = %status, body_summary = %body_summary, "Social login rejected");
            return Err(ExchangeError::Rejected {
                status,
                summary: body_summary,
            });
        }

        let text = response.text().await?;
        let envelope = parse_envelope(&text)?;
        tracing::info!(user_id = envelope.user_id, "Social login accepted");
        Ok(envelope)
    }

    async fn login_native(
        &self,
        username: &str,
        password: &str,
    ) -> ExchangeResult<SessionEnvelope> {
        let url = self.endpoint("auth/login");

        let body = serde_json::json!({
            "username": username,
            "password": password,
            "source": "mobile",
        });

        tracing::debug!("Exchanging credentials for a session");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(status = %status, body_summary = %body_summary, "Credentials login rejected");
            return Err(ExchangeError::Rejected {
                status,
                summary: body_summary,
            });
        }

        let text = response.text().await?;
        let envelope = parse_envelope(&text)?;
        tracing::info!(user_id = envelope.user_id, "Credentials login accepted");
        Ok(envelope)
    }

    async fn register_native(
        &self,
        request: &RegistrationRequest,
    ) -> ExchangeResult<SessionEnvelope> {
        let url = self.endpoint("auth/register");

        // The service expects the email doubled as username and the password
        // mirrored into confirmPassword.
        let body = serde_json::json!({
            "username": request.email,
            "password": request.password,
            "confirmPassword": request.password,
            "firstName": request.first_name,
            "lastName": request.last_name,
            "timezoneId": request.timezone_id,
        });

        tracing::debug!("Registering a new account");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(status = %status, body_summary = %body_summary, "Registration rejected");
            return Err(ExchangeError::Rejected {
                status,
                summary: body_summary,
            });
        }

        let text = response.text().await?;
        let envelope = parse_envelope(&text)?;
        tracing::info!(user_id = envelope.user_id, "Registration accepted");
        Ok(envelope)
    }

    async fn update_timezone(
        &self,
        user_id: i64,
        access_token: &str,
        timezone_id: &str,
    ) -> ExchangeResult<()> {
        let url = self.endpoint("profile/timezone");

        let body = serde_json::json!({
            "userId": user_id,
            "timezoneId": timezone_id,
        });

        tracing::debug!(user_id, timezone_id, "Syncing device timezone");

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(status = %status, body_summary = %body_summary, "Timezone sync rejected");
            return Err(ExchangeError::Rejected {
                status,
                summary: body_summary,
            });
        }

        Ok(())
    }

    async fn update_push_token(
        &self,
        user_id: i64,
        access_token: &str,
        push_token: &str,
    ) -> ExchangeResult<()> {
        let url = self.endpoint("profile/push-token");

        let body = serde_json::json!({
            "userId": user_id,
            "pushToken": push_token,
        });

        tracing::debug!(user_id, "Uploading device push token");

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::warn!(status = %status, body_summary = %body_summary, "Push token upload rejected");
            return Err(ExchangeError::Rejected {
                status,
                summary: body_summary,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let api = AccountApi::new("https://api.trivio.test");
        assert_eq!(api.base_url, "https://api.trivio.test");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let api = AccountApi::new("https://api.trivio.test/");
        assert_eq!(api.base_url, "https://api.trivio.test");
    }

    #[test]
    fn test_endpoint_url() {
        let api = AccountApi::new("https://api.trivio.test");
        assert_eq!(
            api.endpoint("auth/social"),
            "https://api.trivio.test/api/auth/social"
        );
        assert_eq!(
            api.endpoint("profile/push-token"),
            "https://api.trivio.test/api/profile/push-token"
        );
    }

    #[test]
    fn test_body_summary_hides_content() {
        let summary = summarize_response_body("{\"password\":\"hunter2\"}");
        assert!(summary.starts_with("len=22,digest="));
        assert!(!summary.contains("hunter2"));
    }

    #[test]
    fn test_parse_envelope_reports_malformed() {
        let err = parse_envelope("{\"userId\": 3}").unwrap_err();
        assert!(matches!(err, ExchangeError::Malformed(_)));
    }
}
