//! The canonical local representation of the signed-in user.

use serde::{Deserialize, Serialize};
use std::fmt;
use trivio_providers::ProviderKind;

/// The profile record for one authenticated account.
///
/// Built whole from an exchange response and persisted whole; a partially
/// populated record is never written anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Server-assigned id, immutable once issued.
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    /// Remote avatar location, if the account has one.
    pub avatar_url: Option<String>,
    /// Quiz point balance.
    pub points: u32,
    /// True only for the session in which this account was registered.
    pub is_new_user: bool,
}

/// Which identity provider the current session was established through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveProvider {
    /// No session.
    None,
    /// Username/password against the account API.
    Native,
    Facebook,
    Twitter,
}

impl ActiveProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveProvider::None => "none",
            ActiveProvider::Native => "native",
            ActiveProvider::Facebook => "facebook",
            ActiveProvider::Twitter => "twitter",
        }
    }
}

impl fmt::Display for ActiveProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProviderKind> for ActiveProvider {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Facebook => ActiveProvider::Facebook,
            ProviderKind::Twitter => ActiveProvider::Twitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_provider_from_kind() {
        assert_eq!(
            ActiveProvider::from(ProviderKind::Facebook),
            ActiveProvider::Facebook
        );
        assert_eq!(
            ActiveProvider::from(ProviderKind::Twitter),
            ActiveProvider::Twitter
        );
    }

    #[test]
    fn test_active_provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ActiveProvider::Native).unwrap(),
            "\"native\""
        );
        assert_eq!(
            serde_json::to_string(&ActiveProvider::None).unwrap(),
            "\"none\""
        );
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let record = AccountRecord {
            user_id: 9,
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            avatar_url: None,
            points: 150,
            is_new_user: false,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: AccountRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
