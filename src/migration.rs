//! Database migration functionality
//!
//! Tables and indexes come from the DDL generated by `#[model]`; statements
//! are idempotent so startup can run them every time.

use crate::core::EstateCrm;
use crate::entities::{Client, Contract, Property, Transaction};
use crate::errors::CrmError;
use store_object::TableMetadata;
use tracing::info;

impl EstateCrm {
    /// Create the table and indexes for a model
    /// If recreate is true, drops existing table first
    pub async fn auto_migrate<T>(&self, recreate: bool) -> Result<(), CrmError>
    where
        T: TableMetadata,
    {
        let Some(pool) = self.pool() else {
            // Memory stores have no schema
            return Ok(());
        };
        let table = T::table_name();
        let fail = |source| CrmError::Migration { table, source };

        if recreate {
            let drop_sql = T::drop_table_sql();
            crate::debug_log!("Dropping table with SQL: {}", drop_sql);
            sqlx::query(&drop_sql).execute(pool).await.map_err(fail)?;
        }

        let create_table_sql = T::create_table_sql();
        crate::debug_log!("Creating table with SQL: {}", create_table_sql);
        sqlx::query(&create_table_sql)
            .execute(pool)
            .await
            .map_err(fail)?;

        for index_sql in T::create_indexes_sql() {
            crate::debug_log!("Creating index with SQL: {}", index_sql);
            sqlx::query(&index_sql).execute(pool).await.map_err(fail)?;
        }

        info!(table, "table ready");
        Ok(())
    }

    /// Migrate every entity table
    pub async fn migrate_all(&self) -> Result<(), CrmError> {
        self.auto_migrate::<Client>(false).await?;
        self.auto_migrate::<Property>(false).await?;
        self.auto_migrate::<Transaction>(false).await?;
        self.auto_migrate::<Contract>(false).await?;
        Ok(())
    }
}
