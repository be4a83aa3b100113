//! Traits for database operations
//!
//! This module contains all the traits that define the interface for entity
//! persistence, independent of the backing store.

pub mod core;
pub mod table_metadata;

// Re-export all public items for convenience
pub use core::StoreObject;
pub use table_metadata::{DatabaseExecutor, Patch, TableMetadata};
