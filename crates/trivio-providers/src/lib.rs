//! Social identity providers for the Trivio client.
//!
//! Normalizes the Facebook and Twitter login flows into one contract: a
//! [`SocialProvider`] either produces a [`SocialIdentity`] with a usable
//! email or a classified [`ProviderError`]. The interactive half of each
//! vendor flow is behind [`AuthorizationGate`], implemented by the host.

mod adapter;
mod error;
mod facebook;
mod gate;
mod identity;
mod registry;
mod twitter;

pub use adapter::SocialProvider;
pub use error::{ProviderError, ProviderResult};
pub use facebook::FacebookProvider;
pub use gate::{AuthorizationGate, ProviderGrant};
pub use identity::{ProviderKind, SocialIdentity};
pub use registry::ProviderRegistry;
pub use twitter::TwitterProvider;
