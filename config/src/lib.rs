//! # Configuration Management for estate-crm
//!
//! Centralized configuration structures for the CRM server and its client-side data layer:
//! HTTP server, database backend, pagination bounds, seeding and query cache settings.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, DatabaseConfig, StorageBackend};
//!
//! let db_config = DatabaseConfig::postgres("postgresql://localhost:5432/estate_crm");
//! assert_eq!(db_config.backend, StorageBackend::Postgres);
//!
//! let cache_config = CacheConfig::new(30_000, 256);
//! assert_eq!(cache_config.max_entries, 256);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8787
//! cors_origins = ["http://localhost:5173"]
//!
//! [database]
//! backend = "postgres"
//! url = "postgresql://postgres@localhost:5432/estate_crm"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//! auto_migrate = true
//!
//! [pagination]
//! default_limit = 20
//! max_limit = 100
//!
//! [seed]
//! on_list = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // .env, then ESTATE_CRM_CONFIG or ./estate-crm.toml, then DATABASE_URL / DATABASE_KEY / PORT
//! let config = AppConfig::load()?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./estate-crm.toml";

/// Environment variable naming an alternative TOML file
pub const CONFIG_PATH_ENV: &str = "ESTATE_CRM_CONFIG";
/// Store connection URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Store access key, used as the connection password
pub const DATABASE_KEY_ENV: &str = "DATABASE_KEY";
/// Listen port override
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS; empty allows any origin
    pub cors_origins: Vec<String>,
}

/// Which persistence backend serves the entity stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub key: Option<String>,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    /// Create missing tables and indexes at startup
    pub auto_migrate: bool,
}

/// Largest page a list endpoint will ever return
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Page size bounds for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

/// Demo data behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Insert the example rows when a list request finds an empty table
    pub on_list: bool,
}

/// Client-side query cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a cached query result is served without refetching
    pub stale_time_ms: u64,
    /// Upper bound on cached entries; the stalest entry is evicted first
    pub max_entries: usize,
}

impl AppConfig {
    /// Load configuration from `.env`, the TOML file and environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let mut config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::read_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::read_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_env_overrides_from(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `DATABASE_URL`, `DATABASE_KEY` and `PORT` from the given lookup
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(key) = lookup(DATABASE_KEY_ENV).filter(|v| !v.is_empty()) {
            self.database.key = Some(key);
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Server host cannot be empty".to_string(),
            ));
        }

        if self.database.backend == StorageBackend::Postgres {
            match &self.database.url {
                Some(url) if !url.is_empty() => {}
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "Database URL must be set via {} or [database].url for the postgres backend",
                        DATABASE_URL_ENV
                    )))
                }
            }
        }
        if self.database.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.pagination.max_limit == 0 || self.pagination.max_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "Pagination max_limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        if self.pagination.default_limit == 0
            || self.pagination.default_limit > self.pagination.max_limit
        {
            return Err(ConfigError::Invalid(
                "Pagination default_limit must be between 1 and max_limit".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            url: None,
            key: None,
            min_connections: 1,
            max_connections: 10,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
            max_lifetime_seconds: 3600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Postgres configuration with default pool settings
    pub fn postgres(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// In-process backend, no connection required
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { on_list: true }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(stale_time_ms: u64, max_entries: usize) -> Self {
        Self {
            stale_time_ms,
            max_entries,
        }
    }

    /// Stale time as Duration
    pub fn stale_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stale_time_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: 30_000,
            max_entries: 256,
        }
    }
}
