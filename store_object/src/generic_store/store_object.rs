//! Generic store implementations
//!
//! `StoreObject` over PostgreSQL using the static SQL generated by `table_derive`.

use super::core::GenericStore;
use crate::errors::StoreError;
use crate::pagination::{Page, PageRequest};
use crate::traits::{DatabaseExecutor, Patch, StoreObject, TableMetadata};
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl<T> StoreObject for GenericStore<T>
where
    T: TableMetadata + DatabaseExecutor,
{
    type Model = T;

    async fn list(&self, request: &PageRequest) -> Result<Page<Self::Model>, StoreError> {
        // LIMIT takes a BIGINT
        let fetch_limit = request.fetch_limit() as i64;

        let rows = match &request.cursor {
            None => {
                sqlx::query_as::<_, T>(T::first_page_sql())
                    .bind(fetch_limit)
                    .fetch_all(&self.db_pool)
                    .await
            }
            Some(cursor) => {
                sqlx::query_as::<_, T>(T::page_after_sql())
                    .bind(cursor.order_key)
                    .bind(cursor.id.as_str())
                    .bind(fetch_limit)
                    .fetch_all(&self.db_pool)
                    .await
            }
        }
        .map_err(|e| StoreError::database_operation(T::table_name(), "list", e))?;

        tracing::debug!(
            table = T::table_name(),
            rows = rows.len(),
            limit = request.limit,
            "listed page"
        );

        Ok(Page::from_overfetch(rows, request.limit))
    }

    async fn create(&self, record: Self::Model) -> Result<Self::Model, StoreError> {
        let created = record.execute_create(&self.db_pool).await?;
        tracing::debug!(table = T::table_name(), id = created.id(), "created record");
        Ok(created)
    }

    async fn create_many(&self, records: Vec<Self::Model>) -> Result<Vec<Self::Model>, StoreError> {
        let mut results = Vec::with_capacity(records.len());

        // Use transaction for batch inserts
        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "begin", e))?;

        for record in &records {
            results.push(record.execute_create_tx(&mut tx).await?);
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "commit", e))?;

        Ok(results)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Self::Model>, StoreError> {
        sqlx::query_as::<_, T>(T::get_by_id_sql())
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "get", e))
    }

    async fn update(
        &self,
        id: &str,
        patch: &<Self::Model as TableMetadata>::Patch,
    ) -> Result<Option<Self::Model>, StoreError> {
        if patch.is_empty() {
            // Nothing to write; still report a missing id
            return self.get_by_id(id).await;
        }

        let updated = T::bind_patch_params(patch, id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "update", e))?;

        tracing::debug!(
            table = T::table_name(),
            id,
            fields = ?patch.changed_fields(),
            found = updated.is_some(),
            "patched record"
        );

        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(T::delete_by_id_sql())
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let result = sqlx::query(T::count_all_sql())
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "count", e))?;

        let total: i64 = result
            .try_get("total")
            .map_err(|e| StoreError::database_operation(T::table_name(), "count", e))?;
        Ok(total)
    }

    async fn ensure_seed(&self, records: Vec<Self::Model>) -> Result<usize, StoreError> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "begin", e))?;

        let mut inserted = 0;
        for record in &records {
            if record.execute_seed_tx(&mut tx).await?.is_some() {
                inserted += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "commit", e))?;

        if inserted > 0 {
            tracing::info!(table = T::table_name(), inserted, "seeded empty table");
        }
        Ok(inserted)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .map_err(|e| StoreError::database_operation(T::table_name(), "health_check", e))?;
        Ok(())
    }
}
