//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{DatabaseExecutor, Patch, StoreObject, TableMetadata};

// Error types
pub use crate::errors::StoreError;

// Backends
pub use crate::generic_store::GenericStore;
pub use crate::memory_store::MemoryStore;

// Paging and validation
pub use crate::pagination::{Cursor, Page, PageRequest};
pub use crate::validation::{Validate, ValidationErrors, ValidationMode, Validator};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use sqlx::{FromRow, PgPool, Row};
