//! Cached reads and invalidating writes over `ApiClient`
//!
//! Keys follow resource names: `clients` for the collection,
//! `clients/<id>` for one record, `dashboard` for the summary. A write to a
//! resource drops its whole key tree plus the dashboard.

use cache_system::{CacheConfig, QueryCache, QueryKey};
use tracing::debug;

use super::api_client::{ApiClient, Result};
use crate::api::DeleteResult;
use crate::entities::Entity;
use crate::reports::DashboardSummary;

pub const DASHBOARD_KEY: &str = "dashboard";

#[derive(Debug, Clone)]
pub struct DataLayer {
    api: ApiClient,
    cache: QueryCache,
}

impl DataLayer {
    pub fn new(api: ApiClient, config: CacheConfig) -> Self {
        Self {
            api,
            cache: QueryCache::new(config),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Every record of `E`, cached under its resource key
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>> {
        let key = QueryKey::resource(E::RESOURCE);
        self.cache
            .get_or_fetch(&key, || self.api.list_all::<E>())
            .await
    }

    pub async fn get<E: Entity>(&self, id: &str) -> Result<E> {
        let key = QueryKey::resource(E::RESOURCE).child(id);
        self.cache.get_or_fetch(&key, || self.api.get::<E>(id)).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let key = QueryKey::resource(DASHBOARD_KEY);
        self.cache.get_or_fetch(&key, || self.api.dashboard()).await
    }

    pub async fn create<E: Entity>(&self, payload: &E::Patch) -> Result<E> {
        let created = self.api.create::<E>(payload).await?;
        self.invalidate_resource::<E>().await;
        Ok(created)
    }

    pub async fn update<E: Entity>(&self, id: &str, patch: &E::Patch) -> Result<E> {
        let updated = self.api.update::<E>(id, patch).await?;
        self.invalidate_resource::<E>().await;
        Ok(updated)
    }

    pub async fn delete<E: Entity>(&self, id: &str) -> Result<DeleteResult> {
        let result = self.api.delete::<E>(id).await?;
        self.invalidate_resource::<E>().await;
        Ok(result)
    }

    /// Drop everything cached for `E` and the figures derived from it
    pub async fn invalidate_resource<E: Entity>(&self) {
        let dropped = self.cache.invalidate(&QueryKey::resource(E::RESOURCE)).await
            + self.cache.invalidate(&QueryKey::resource(DASHBOARD_KEY)).await;
        debug!(resource = E::RESOURCE, dropped, "invalidated cached queries");
    }
}
