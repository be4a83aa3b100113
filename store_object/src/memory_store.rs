//! In-process store
//!
//! A `StoreObject` over a `HashMap` guarded by a tokio `RwLock`. It honours the
//! same ordering, paging and patch semantics as `GenericStore`, so the HTTP
//! layer and tests can run without PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::pagination::{Page, PageRequest};
use crate::traits::{Patch, StoreObject, TableMetadata};

#[derive(Clone)]
pub struct MemoryStore<T: TableMetadata> {
    records: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: TableMetadata> std::fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("table", &T::table_name())
            .finish()
    }
}

impl<T: TableMetadata> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableMetadata> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn duplicate(id: &str) -> StoreError {
        StoreError::Conflict(format!(
            "{} create failed: id '{}' already exists",
            T::table_name(),
            id
        ))
    }
}

/// Newest first, ties broken by id descending
fn list_order<T: TableMetadata>(a: &T, b: &T) -> std::cmp::Ordering {
    (b.order_key(), b.id()).cmp(&(a.order_key(), a.id()))
}

#[async_trait]
impl<T: TableMetadata> StoreObject for MemoryStore<T> {
    type Model = T;

    async fn list(&self, request: &PageRequest) -> Result<Page<Self::Model>, StoreError> {
        let records = self.records.read().await;

        let mut rows: Vec<T> = records
            .values()
            .filter(|record| match &request.cursor {
                Some(cursor) => cursor.precedes(*record),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(list_order::<T>);
        rows.truncate(request.fetch_limit());

        Ok(Page::from_overfetch(rows, request.limit))
    }

    async fn create(&self, record: Self::Model) -> Result<Self::Model, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(Self::duplicate(record.id()));
        }
        records.insert(record.id().to_string(), record.clone());
        Ok(record)
    }

    async fn create_many(&self, records: Vec<Self::Model>) -> Result<Vec<Self::Model>, StoreError> {
        let mut stored = self.records.write().await;

        // All or nothing: check every id before inserting any
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if stored.contains_key(record.id()) || !seen.insert(record.id()) {
                return Err(Self::duplicate(record.id()));
            }
        }

        for record in &records {
            stored.insert(record.id().to_string(), record.clone());
        }
        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Self::Model>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &str,
        patch: &<Self::Model as TableMetadata>::Patch,
    ) -> Result<Option<Self::Model>, StoreError> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(record);
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn ensure_seed(&self, records: Vec<Self::Model>) -> Result<usize, StoreError> {
        // Held across the emptiness check so concurrent first requests seed once
        let mut stored = self.records.write().await;
        if !stored.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for record in records {
            if !stored.contains_key(record.id()) {
                stored.insert(record.id().to_string(), record);
                inserted += 1;
            }
        }

        if inserted > 0 {
            tracing::info!(table = T::table_name(), inserted, "seeded empty table");
        }
        Ok(inserted)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
