//! Trait definitions
//!
//! Metadata and SQL for a stored entity. Implementations are generated by
//! `#[model]` / `#[derive(TableMetadata)]` from `table_derive`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Metadata about database table structure and operations
/// This trait should be derived using the `#[model]` attribute macro, which
/// automatically includes all necessary derives.
///
/// ```ignore
/// use table_derive::model;
///
/// #[model]
/// #[table(name = "notes", order_by = "created_at")]
/// pub struct Note {
///     #[primary_key]
///     pub id: String,
///
///     #[field(create, update)]
///     pub body: String,
///
///     #[field(create)]
///     pub created_at: DateTime<Utc>,
///
///     #[field(create)]
///     #[updated_at]
///     pub updated_at: DateTime<Utc>,
/// }
/// ```
pub trait TableMetadata:
    Clone
    + Send
    + Sync
    + Debug
    + Unpin
    + Serialize
    + DeserializeOwned
    + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
    + 'static
{
    /// Partial-write companion generated alongside the model
    type Patch: Patch<Self>;

    /// The table name in the database
    fn table_name() -> &'static str;

    /// Get the primary key column name
    fn primary_key_field() -> &'static str;

    /// Column that list queries order by, descending
    fn order_column() -> &'static str;

    /// SQL for INSERT of every writable column
    fn insert_sql() -> &'static str;

    /// INSERT that skips rows whose primary key already exists
    fn seed_insert_sql() -> &'static str;

    /// UPDATE keeping current values for NULL parameters
    fn patch_sql() -> &'static str;

    /// SQL for SELECT by ID operation (optimized static query)
    fn get_by_id_sql() -> &'static str;

    /// SQL for DELETE by ID operation (optimized static query)
    fn delete_by_id_sql() -> &'static str;

    /// SQL for COUNT all operation, yielding a `total` column
    fn count_all_sql() -> &'static str;

    /// First page: `$1` is the row limit
    fn first_page_sql() -> &'static str;

    /// Page after a cursor: `$1` ordering value, `$2` id, `$3` row limit
    fn page_after_sql() -> &'static str;

    /// Generate CREATE TABLE SQL statement
    fn create_table_sql() -> String;

    /// Generate CREATE INDEX SQL statements
    fn create_indexes_sql() -> Vec<String>;

    /// Generate DROP TABLE SQL statement
    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS \"{}\"", Self::table_name())
    }

    fn column_names() -> &'static [&'static str];

    /// Primary key of this record
    fn id(&self) -> &str;

    /// Value of the ordering column for this record
    fn order_key(&self) -> DateTime<Utc>;

    /// Bind a patch and the target id to `patch_sql()`
    fn bind_patch_params<'a>(
        patch: &'a Self::Patch,
        id: &'a str,
    ) -> sqlx::query::QueryAs<'a, sqlx::Postgres, Self, sqlx::postgres::PgArguments>;
}

/// All-optional companion of a model, used for partial updates and create payloads
pub trait Patch<M>:
    Clone + Default + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Overwrite the supplied fields of `model` and refresh its update timestamp
    fn apply_to(&self, model: &mut M);

    /// Column names of the supplied fields
    fn changed_fields(&self) -> Vec<&'static str>;

    fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

/// Async trait for database operations that properly handles async/await
/// This separates database operations from metadata, providing better error handling and abstraction
#[async_trait]
pub trait DatabaseExecutor: TableMetadata {
    /// Execute INSERT with bound parameters
    async fn execute_create(&self, pool: &sqlx::PgPool) -> Result<Self, crate::errors::StoreError>;

    /// Execute INSERT inside a transaction
    async fn execute_create_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Self, crate::errors::StoreError>;

    /// Execute the seed INSERT inside a transaction; `None` when the id was taken
    async fn execute_seed_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<Self>, crate::errors::StoreError>;
}
