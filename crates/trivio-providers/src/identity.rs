//! Provider tags and the normalized identity they produce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of supported social identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Facebook,
    Twitter,
}

impl ProviderKind {
    /// All supported providers, in registry order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Facebook, ProviderKind::Twitter];

    /// Lowercase wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Facebook => "facebook",
            ProviderKind::Twitter => "twitter",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider-neutral identity produced by one login handshake.
///
/// Consumed exactly once by the account exchange, then discarded; never
/// persisted. `email` is guaranteed present; an account whose email the
/// provider withheld is reported as a failure instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIdentity {
    pub provider: ProviderKind,
    /// The provider's own id for this account.
    pub provider_user_id: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_wire_names() {
        assert_eq!(ProviderKind::Facebook.as_str(), "facebook");
        assert_eq!(ProviderKind::Twitter.as_str(), "twitter");
        assert_eq!(ProviderKind::Facebook.to_string(), "facebook");
    }

    #[test]
    fn test_provider_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::Facebook).unwrap(),
            "\"facebook\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::Twitter).unwrap(),
            "\"twitter\""
        );
    }

    #[test]
    fn test_provider_kind_all_is_exhaustive() {
        let unique: std::collections::HashSet<_> = ProviderKind::ALL.iter().collect();
        assert_eq!(unique.len(), ProviderKind::ALL.len());
    }
}
