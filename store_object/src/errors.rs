use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Wrap a sqlx failure, naming the table and the operation that hit it
    pub fn database_operation(table: &str, operation: &str, error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::Conflict(format!(
                    "{} {} failed: {}",
                    table,
                    operation,
                    db_error.message()
                ));
            }
        }
        StoreError::DatabaseError(format!("{} {} failed: {}", table, operation, error))
    }

    pub fn not_found(table: &str, id: &str) -> Self {
        StoreError::NotFound(format!("{} record '{}'", table, id))
    }

    pub fn serialization(table: &str, error: serde_json::Error) -> Self {
        StoreError::SerializationError(format!("{}: {}", table, error))
    }

    /// Whether the caller sent something unacceptable, as opposed to a backend failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::InvalidCursor(_) | StoreError::Conflict(_)
        )
    }
}
