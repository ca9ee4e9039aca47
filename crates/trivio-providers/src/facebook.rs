//! Facebook login adapter.

use crate::{
    AuthorizationGate, ProviderError, ProviderGrant, ProviderKind, ProviderResult, SocialIdentity,
    SocialProvider,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Default Graph API base URL.
const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// Profile fields requested from the Graph API. `email` is granted only if
/// the user approved the email permission during the handshake.
const PROFILE_FIELDS: &str = "id,name,email,picture.width(480)";

/// Facebook implementation of [`SocialProvider`].
pub struct FacebookProvider {
    http_client: reqwest::Client,
    graph_url: String,
    gate: Arc<dyn AuthorizationGate>,
    session_token: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct GraphProfile {
    id: String,
    name: String,
    email: Option<String>,
    picture: Option<GraphPicture>,
}

#[derive(Debug, Deserialize)]
struct GraphPicture {
    data: GraphPictureData,
}

#[derive(Debug, Deserialize)]
struct GraphPictureData {
    url: Option<String>,
}

impl FacebookProvider {
    /// Create an adapter using the public Graph API.
    pub fn new(gate: Arc<dyn AuthorizationGate>) -> Self {
        Self::with_graph_url(gate, DEFAULT_GRAPH_URL)
    }

    /// Create an adapter against a custom Graph API base URL.
    pub fn with_graph_url(gate: Arc<dyn AuthorizationGate>, graph_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            graph_url: graph_url.into(),
            gate,
            session_token: Mutex::new(None),
        }
    }

    fn profile_url(&self) -> String {
        format!("{}/me?fields={}", self.graph_url, PROFILE_FIELDS)
    }

    fn revoke_url(&self) -> String {
        format!("{}/me/permissions", self.graph_url)
    }

    /// Normalize a Graph profile into a [`SocialIdentity`].
    fn identity_from_profile(profile: GraphProfile) -> ProviderResult<SocialIdentity> {
        let email = match profile.email {
            Some(email) if !email.is_empty() => email,
            _ => return Err(ProviderError::EmailNotShared(ProviderKind::Facebook)),
        };

        Ok(SocialIdentity {
            provider: ProviderKind::Facebook,
            provider_user_id: profile.id,
            email,
            full_name: profile.name,
            avatar_url: profile.picture.and_then(|p| p.data.url),
        })
    }
}

#[async_trait]
impl SocialProvider for FacebookProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Facebook
    }

    async fn begin_login(&self) -> ProviderResult<SocialIdentity> {
        let ProviderGrant { access_token } =
            self.gate.authorize(ProviderKind::Facebook).await?;

        // The vendor session exists from this point on; it is cleared by
        // invalidate_session whether or not the profile fetch succeeds.
        *self.session_token.lock().unwrap() = Some(access_token.clone());

        let response = self
            .http_client
            .get(self.profile_url())
            .query(&[("access_token", access_token.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "facebook profile request rejected");
            return Err(ProviderError::Profile(format!(
                "graph api returned {}",
                status
            )));
        }

        let profile: GraphProfile = response.json().await?;
        let identity = Self::identity_from_profile(profile)?;

        info!(provider = %self.kind(), "provider login complete");
        Ok(identity)
    }

    async fn invalidate_session(&self) {
        let token = self.session_token.lock().unwrap().take();
        let Some(token) = token else {
            debug!("no facebook session to invalidate");
            return;
        };

        // Best effort: the local session is gone either way.
        match self
            .http_client
            .delete(self.revoke_url())
            .query(&[("access_token", token.as_str())])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!("facebook permissions revoked");
            }
            Ok(response) => {
                warn!(status = %response.status(), "facebook revoke rejected");
            }
            Err(err) => {
                warn!(error = %err, "facebook revoke failed");
            }
        }
    }
}
