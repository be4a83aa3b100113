//! Cache system for client-side query results
//!
//! This crate provides an in-process cache of fetched query results keyed by a
//! resource path, with stale-time expiry and prefix invalidation.

pub mod errors;
pub mod key;
pub mod manager;
pub mod prelude;

// Re-export centralized config
pub use config::CacheConfig;

pub use errors::CacheError;
pub use key::QueryKey;
pub use manager::QueryCache;
