//! Unified type mapping between Rust types and PostgreSQL
//! This crate provides consistent mapping logic used across the estate-crm workspace:
//! DDL type names for derived tables and TEXT-backed enums usable in serde and sqlx.

pub mod sql;
pub mod text_enum;

pub use sql::{is_optional_type, rust_type_to_pg_type};
pub use text_enum::UnknownVariant;

// Re-exported for `text_enum!` expansions in downstream crates
pub use serde;
pub use sqlx;
