//! Fixed lookup of adapters by provider tag.

use crate::{ProviderKind, SocialProvider};
use std::sync::Arc;

/// One adapter slot per supported provider.
///
/// The session workflow resolves the adapter for a login by tag and walks
/// every slot during logout.
pub struct ProviderRegistry {
    facebook: Arc<dyn SocialProvider>,
    twitter: Arc<dyn SocialProvider>,
}

impl ProviderRegistry {
    /// Assemble the registry from one adapter per provider.
    pub fn new(facebook: Arc<dyn SocialProvider>, twitter: Arc<dyn SocialProvider>) -> Self {
        debug_assert_eq!(facebook.kind(), ProviderKind::Facebook);
        debug_assert_eq!(twitter.kind(), ProviderKind::Twitter);
        Self { facebook, twitter }
    }

    /// The adapter for `kind`.
    pub fn adapter(&self, kind: ProviderKind) -> Arc<dyn SocialProvider> {
        match kind {
            ProviderKind::Facebook => Arc::clone(&self.facebook),
            ProviderKind::Twitter => Arc::clone(&self.twitter),
        }
    }

    /// Every adapter, for whole-set operations.
    pub fn all(&self) -> [Arc<dyn SocialProvider>; 2] {
        [Arc::clone(&self.facebook), Arc::clone(&self.twitter)]
    }
}
