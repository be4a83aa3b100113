//! Core EstateCrm functionality
//!
//! This module builds the backing stores from configuration and owns the
//! database pool when the PostgreSQL backend is selected.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use store_object::{GenericStore, MemoryStore, StoreObject};
use tracing::info;

use crate::entities::{Client, Contract, Property, Transaction};
use crate::errors::CrmError;
use config::{AppConfig, DatabaseConfig, StorageBackend};

/// One store per entity, shared by every request
#[derive(Clone, Debug)]
pub struct Stores {
    pub clients: Arc<dyn StoreObject<Model = Client>>,
    pub properties: Arc<dyn StoreObject<Model = Property>>,
    pub transactions: Arc<dyn StoreObject<Model = Transaction>>,
    pub contracts: Arc<dyn StoreObject<Model = Contract>>,
}

impl Stores {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            clients: Arc::new(GenericStore::<Client>::new(pool.clone())),
            properties: Arc::new(GenericStore::<Property>::new(pool.clone())),
            transactions: Arc::new(GenericStore::<Transaction>::new(pool.clone())),
            contracts: Arc::new(GenericStore::<Contract>::new(pool.clone())),
        }
    }

    pub fn memory() -> Self {
        Self {
            clients: Arc::new(MemoryStore::<Client>::new()),
            properties: Arc::new(MemoryStore::<Property>::new()),
            transactions: Arc::new(MemoryStore::<Transaction>::new()),
            contracts: Arc::new(MemoryStore::<Contract>::new()),
        }
    }
}

/// Application coordinator: configuration, optional pool and the stores
pub struct EstateCrm {
    config: AppConfig,
    pool: Option<PgPool>,
    stores: Stores,
}

impl EstateCrm {
    /// Connect the configured backend and, for PostgreSQL, migrate if enabled
    pub async fn connect(config: AppConfig) -> Result<Self, CrmError> {
        match config.database.backend {
            StorageBackend::Memory => {
                info!("using in-memory storage");
                Ok(Self::in_memory(config))
            }
            StorageBackend::Postgres => {
                let pool = Self::create_pool(&config.database).await?;
                let crm = Self {
                    stores: Stores::postgres(&pool),
                    pool: Some(pool),
                    config,
                };
                if crm.config.database.auto_migrate {
                    crm.migrate_all().await?;
                }
                Ok(crm)
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            config,
            pool: None,
            stores: Stores::memory(),
        }
    }

    async fn create_pool(database: &DatabaseConfig) -> Result<PgPool, CrmError> {
        let url = database.url.as_deref().ok_or(CrmError::MissingDatabaseUrl)?;

        let mut options = PgConnectOptions::from_str(url)?;
        if let Some(key) = database.key.as_deref() {
            options = options.password(key);
        }

        let mut pool_options = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect_with(options).await?;
        info!(
            max_connections = database.max_connections,
            "connected to PostgreSQL"
        );
        Ok(pool)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Database pool, when the PostgreSQL backend is in use
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }
}
