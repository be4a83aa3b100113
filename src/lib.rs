//! # estate-crm
//!
//! Real-estate CRM backend: clients, property listings, an accounting ledger,
//! contracts and a sales pipeline, served as a REST API over PostgreSQL or an
//! in-process store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use estate_crm::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let crm = EstateCrm::connect(config).await?;
//!
//!     let app = create_app(AppState::from(&crm), &crm.config().server.cors_origins);
//!     let listener = tokio::net::TcpListener::bind(crm.config().server.bind_address()).await?;
//!     serve_on(listener, app).await
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod api;
pub mod client;
pub mod core;
pub mod entities;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod reports;

// Re-export the main public types for convenience
pub use core::{EstateCrm, Stores};
pub use errors::CrmError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, StorageBackend};

// Re-export internal crates used by macros and public API
pub use cache_system;
pub use store_object;
pub use table_derive;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
