//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::errors::CacheError;
pub use crate::key::QueryKey;
pub use crate::manager::QueryCache;

// Re-export centralized config
pub use config::CacheConfig;
