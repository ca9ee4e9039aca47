//! Twitter login adapter.

use crate::{
    AuthorizationGate, ProviderError, ProviderGrant, ProviderKind, ProviderResult, SocialIdentity,
    SocialProvider,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Default REST API base URL.
const DEFAULT_API_URL: &str = "https://api.twitter.com/1.1";

/// Twitter implementation of [`SocialProvider`].
///
/// Email access requires the "request email address" permission on the app;
/// without it `verify_credentials` omits the field and the login is
/// reported as email-not-shared.
pub struct TwitterProvider {
    http_client: reqwest::Client,
    api_url: String,
    gate: Arc<dyn AuthorizationGate>,
    session_token: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct TwitterProfile {
    id_str: String,
    name: String,
    email: Option<String>,
    profile_image_url_https: Option<String>,
}

impl TwitterProvider {
    /// Create an adapter using the public REST API.
    pub fn new(gate: Arc<dyn AuthorizationGate>) -> Self {
        Self::with_api_url(gate, DEFAULT_API_URL)
    }

    /// Create an adapter against a custom REST API base URL.
    pub fn with_api_url(gate: Arc<dyn AuthorizationGate>, api_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into(),
            gate,
            session_token: Mutex::new(None),
        }
    }

    fn verify_url(&self) -> String {
        format!(
            "{}/account/verify_credentials.json?include_email=true&skip_status=true",
            self.api_url
        )
    }

    fn invalidate_url(&self) -> String {
        format!("{}/oauth/invalidate_token.json", self.api_url)
    }

    /// Normalize a `verify_credentials` payload into a [`SocialIdentity`].
    fn identity_from_profile(profile: TwitterProfile) -> ProviderResult<SocialIdentity> {
        let email = match profile.email {
            Some(email) if !email.is_empty() => email,
            _ => return Err(ProviderError::EmailNotShared(ProviderKind::Twitter)),
        };

        Ok(SocialIdentity {
            provider: ProviderKind::Twitter,
            provider_user_id: profile.id_str,
            email,
            full_name: profile.name,
            avatar_url: profile.profile_image_url_https,
        })
    }
}

#[async_trait]
impl SocialProvider for TwitterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Twitter
    }

    async fn begin_login(&self) -> ProviderResult<SocialIdentity> {
        let ProviderGrant { access_token } =
            self.gate.authorize(ProviderKind::Twitter).await?;

        *self.session_token.lock().unwrap() = Some(access_token.clone());

        let response = self
            .http_client
            .get(self.verify_url())
            .bearer_auth(&access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "twitter credential verification rejected");
            return Err(ProviderError::Profile(format!(
                "verify_credentials returned {}",
                status
            )));
        }

        let profile: TwitterProfile = response.json().await?;
        let identity = Self::identity_from_profile(profile)?;

        info!(provider = %self.kind(), "provider login complete");
        Ok(identity)
    }

    async fn invalidate_session(&self) {
        let token = self.session_token.lock().unwrap().take();
        let Some(token) = token else {
            debug!("no twitter session to invalidate");
            return;
        };

        match self
            .http_client
            .post(self.invalidate_url())
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!("twitter token invalidated");
            }
            Ok(response) => {
                warn!(status = %response.status(), "twitter invalidate rejected");
            }
            Err(err) => {
                warn!(error = %err, "twitter invalidate failed");
            }
        }
    }
}
