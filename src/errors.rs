//! Error types for the estate-crm crate
//!
//! This module contains the errors returned while starting up, migrating and
//! seeding. Request-level failures are `api::ApiError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] store_object::StoreError),

    #[error("DATABASE_URL is not set; the postgres backend needs a connection string")]
    MissingDatabaseUrl,

    #[error("Migration of {table} failed: {source}")]
    Migration {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}
