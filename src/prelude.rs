//! Convenience re-exports for common estate-crm usage
//!
//! ```rust
//! use estate_crm::prelude::*;
//!
//! let stores = Stores::memory();
//! let state = AppState::new(stores, &AppConfig::default());
//! assert_eq!(state.pagination.default_limit, 20);
//! ```

// Core components
pub use crate::core::{EstateCrm, Stores};
pub use crate::errors::CrmError;

// HTTP layer
pub use crate::api::{create_app, run_server, serve_on, ApiError, ApiResponse, AppState, DeleteResult};

// Entities
pub use crate::entities::*;

// Client side
pub use crate::client::{ApiClient, ClientError, DataLayer, DropTarget, MoveOutcome, PipelineBoard};
pub use crate::reports::DashboardSummary;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, StorageBackend};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export cache system
pub use cache_system::prelude::*;

// Re-export table derive for model creation
pub use table_derive::{model, TableMetadata};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
