//! Storage key constants.

/// Storage keys used by the client core
pub struct StorageKeys;

impl StorageKeys {
    /// Server-assigned auth record id (decimal string; absent for some
    /// provider flows)
    pub const AUTH_ID: &'static str = "auth_id";

    /// Account API access token
    pub const ACCESS_TOKEN: &'static str = "access_token";
}
