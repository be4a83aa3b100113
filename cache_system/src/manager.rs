//! Query cache implementation
//!
//! Results are stored as JSON values so one cache holds every resource type.
//! An entry is fresh for `stale_time` after it was written; stale entries are
//! refetched on the next `get_or_fetch`.

use crate::errors::CacheError;
use crate::key::QueryKey;
use config::CacheConfig;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    stored_at: Instant,
}

/// Shared cache of fetched query results
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    config: Arc<CacheConfig>,
}

impl Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = match self.entries.try_read() {
            Ok(entries) => entries.len().to_string(),
            Err(_) => "locked".to_string(),
        };

        f.debug_struct("QueryCache")
            .field("config", &self.config)
            .field("entries", &entries)
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        entry.stored_at.elapsed() < self.config.stale_time()
    }

    /// Fresh cached value for `key`, if any
    pub async fn get<T>(&self, key: &QueryKey) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry) => {
                Ok(Some(serde_json::from_value(entry.value.clone())?))
            }
            _ => Ok(None),
        }
    }

    /// Store `value` under `key`, evicting the oldest entry when full
    pub async fn set<T>(&self, key: &QueryKey, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.write().await;

        if !entries.contains_key(key) && entries.len() >= self.config.max_entries.max(1) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.clone(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Serve `key` from cache while fresh, otherwise run `fetch` and cache its result
    ///
    /// A failed fetch leaves the cache untouched.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key).await? {
            return Ok(cached);
        }

        let fetched = fetch().await?;
        self.set(key, &fetched).await?;
        Ok(fetched)
    }

    /// Drop `prefix` and every key under it, returning how many entries went
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fetch_counter() -> (Arc<AtomicUsize>, impl Fn() -> Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = calls.clone();
        (calls, move || handle.clone())
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_from_cache() {
        let cache = QueryCache::new(CacheConfig::new(60_000, 16));
        let key = QueryKey::resource("clients");
        let (calls, counter) = fetch_counter();

        for _ in 0..3 {
            let counter = counter();
            let value: Vec<String> = cache
                .get_or_fetch(&key, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CacheError>(vec!["cli-1".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["cli-1".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_refetches() {
        let cache = QueryCache::new(CacheConfig::new(0, 16));
        let key = QueryKey::resource("clients");
        let (calls, counter) = fetch_counter();

        for _ in 0..2 {
            let counter = counter();
            let _: u32 = cache
                .get_or_fetch(&key, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CacheError>(7)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_drops_prefixed_keys() {
        let cache = QueryCache::default();
        let clients = QueryKey::resource("clients");
        let pipeline = clients.child("pipeline");
        let properties = QueryKey::resource("properties");

        cache.set(&clients, &1).await.unwrap();
        cache.set(&pipeline, &2).await.unwrap();
        cache.set(&properties, &3).await.unwrap();

        assert_eq!(cache.invalidate(&clients).await, 2);
        assert!(!cache.contains(&pipeline).await);
        assert_eq!(cache.get::<i32>(&properties).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_state() {
        let cache = QueryCache::new(CacheConfig::new(0, 16));
        let key = QueryKey::resource("contracts");
        cache.set(&key, &"old").await.unwrap();

        let result: Result<String, CacheError> = cache
            .get_or_fetch(&key, || async {
                Err(CacheError::InvalidKey("boom".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(cache.contains(&key).await);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = QueryCache::new(CacheConfig::new(60_000, 2));
        let a = QueryKey::resource("a");
        let b = QueryKey::resource("b");
        let c = QueryKey::resource("c");

        cache.set(&a, &1).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        cache.set(&b, &2).await.unwrap();
        cache.set(&c, &3).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert!(!cache.contains(&a).await);
        assert!(cache.contains(&c).await);
    }
}
