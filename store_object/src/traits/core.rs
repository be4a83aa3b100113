//! Trait definitions
//!
//! This module defines the backend-neutral store contract. `GenericStore`
//! (PostgreSQL) and `MemoryStore` (in-process) both implement it, and callers
//! hold stores as `Arc<dyn StoreObject<Model = T>>`.

use crate::errors::StoreError;
use crate::pagination::{Page, PageRequest};
use crate::traits::table_metadata::TableMetadata;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait that defines common database operations for all entities
#[async_trait]
pub trait StoreObject: Send + Sync + Debug {
    /// The model type that this object represents
    type Model: TableMetadata;

    /// One page of records, newest first, with the cursor for the next page
    async fn list(&self, request: &PageRequest) -> Result<Page<Self::Model>, StoreError>;

    /// Insert a fully built record and return the persisted shape
    async fn create(&self, record: Self::Model) -> Result<Self::Model, StoreError>;

    /// Insert several records atomically
    async fn create_many(&self, records: Vec<Self::Model>) -> Result<Vec<Self::Model>, StoreError>;

    /// Get an object by its ID
    async fn get_by_id(&self, id: &str) -> Result<Option<Self::Model>, StoreError>;

    /// Apply the supplied fields of `patch`; `None` when the id does not exist
    async fn update(
        &self,
        id: &str,
        patch: &<Self::Model as TableMetadata>::Patch,
    ) -> Result<Option<Self::Model>, StoreError>;

    /// Delete an object by its ID, reporting whether a row was removed
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Count total objects of this type
    async fn count(&self) -> Result<i64, StoreError>;

    /// Insert `records` when the table is empty, returning how many rows were added
    ///
    /// Records whose id already exists are skipped, so two callers racing on an
    /// empty table end up with one copy of each seed row.
    async fn ensure_seed(&self, records: Vec<Self::Model>) -> Result<usize, StoreError>;

    /// Check that the backing store answers
    async fn health_check(&self) -> Result<(), StoreError>;
}
