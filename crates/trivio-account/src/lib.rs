//! Account domain types, the remote exchange contract, and the local cache.
//!
//! This crate owns everything between a proven identity and a usable local
//! session: the canonical [`AccountRecord`], the [`AccountExchange`] trait
//! with its reqwest-backed [`AccountApi`] implementation, and the
//! [`AccountCache`] trait with a JSON-document [`FileAccountCache`]. The
//! session workflows in `trivio-session` drive these; nothing here decides
//! whether the user is logged in.

pub mod api;
pub mod cache;
pub mod exchange;
pub mod record;

pub use api::AccountApi;
pub use cache::{
    AccountCache, CacheError, CacheResult, CachedAccount, FileAccountCache, MemoryAccountCache,
};
pub use exchange::{
    AccountExchange, ExchangeError, ExchangeResult, RegistrationRequest, SessionEnvelope,
};
pub use record::{AccountRecord, ActiveProvider};
