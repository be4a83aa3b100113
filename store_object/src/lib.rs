//! Store Object - persistence layer for estate-crm entities
//!
//! This crate provides the backend-neutral `StoreObject` contract, its
//! PostgreSQL (`GenericStore`) and in-process (`MemoryStore`) backends, keyset
//! pagination and payload validation.

pub mod errors;
pub mod generic_store;
pub mod memory_store;
pub mod pagination;
pub mod prelude;
pub mod traits;
pub mod validation;

pub use errors::StoreError;
pub use generic_store::GenericStore;
pub use memory_store::MemoryStore;
pub use pagination::{Cursor, Page, PageRequest};
pub use traits::*;
pub use validation::{Validate, ValidationErrors, ValidationMode, Validator, Violation};

use sqlx::PgPool;

pub type DbPool = PgPool;
