// App state for the Axum server
use config::{AppConfig, PaginationConfig, SeedConfig};

use crate::core::{EstateCrm, Stores};

#[derive(Clone, Debug)]
pub struct AppState {
    pub stores: Stores,
    pub pagination: PaginationConfig,
    pub seed: SeedConfig,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        Self {
            stores,
            pagination: config.pagination.clone(),
            seed: config.seed.clone(),
        }
    }
}

impl From<&EstateCrm> for AppState {
    fn from(crm: &EstateCrm) -> Self {
        Self::new(crm.stores().clone(), crm.config())
    }
}
