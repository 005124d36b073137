//! Memory cache implementation
//!
//! This module provides the in-memory cache store:
//! - `MemoryCache`: one generation, an unbounded moka cache keyed by request identity
//! - `MemoryCacheStorage`: the generation registry, in creation order

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use super::entry::{RequestKey, StoredResponse};
use super::error::CacheError;
use super::stats::{CacheStats, CacheStatsTracker};
use super::traits::{Cache, CacheStorage};

/// MemoryCache wraps moka for our Cache trait.
///
/// No capacity, TTL or idle expiry is configured: entries live until they are
/// overwritten or their generation is deleted.
pub struct MemoryCache {
    name: String,
    entries: moka::future::Cache<RequestKey, StoredResponse>,
    stats: Arc<CacheStatsTracker>,
}

impl MemoryCache {
    fn new(name: &str, stats: Arc<CacheStatsTracker>) -> Self {
        let entries = moka::future::Cache::builder().name(name).build();
        Self {
            name: name.to_string(),
            entries,
            stats,
        }
    }

    /// Lookup without touching the statistics
    async fn get_entry(&self, key: &RequestKey) -> Option<StoredResponse> {
        self.entries.get(key).await
    }

    /// Number of entries in this generation
    pub fn entry_count(&self) -> u64 {
        self.entries.iter().count() as u64
    }
}

#[async_trait]
impl Cache for MemoryCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn match_request(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError> {
        let found = self.get_entry(key).await;
        self.stats.record_lookup(found.is_some());
        Ok(found)
    }

    async fn put(&self, key: RequestKey, response: StoredResponse) -> Result<(), CacheError> {
        if !key.is_get() {
            return Err(CacheError::MethodNotCacheable { method: key.method });
        }
        self.entries.insert(key, response).await;
        self.stats.increment_writes();
        Ok(())
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool, CacheError> {
        let existed = self.entries.remove(key).await.is_some();
        self.stats.increment_deletes();
        Ok(existed)
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, CacheError> {
        Ok(self.entries.iter().map(|(k, _)| (*k).clone()).collect())
    }
}

/// In-memory registry of cache generations.
///
/// # Example
/// ```
/// use offline_shell::cache::{CacheStorage, MemoryCacheStorage};
///
/// # tokio_test::block_on(async {
/// let storage = MemoryCacheStorage::new();
/// storage.open("app-v1").await.unwrap();
/// storage.open("app-v2").await.unwrap();
/// assert_eq!(storage.list_generations().await.unwrap(), vec!["app-v1", "app-v2"]);
/// # });
/// ```
pub struct MemoryCacheStorage {
    // Creation order is preserved; lookups across generations walk it front to back
    generations: RwLock<Vec<Arc<MemoryCache>>>,
    stats: Arc<CacheStatsTracker>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self {
            generations: RwLock::new(Vec::new()),
            stats: Arc::new(CacheStatsTracker::new()),
        }
    }

    /// Get cache statistics snapshot
    pub fn stats(&self) -> CacheStats {
        let generations = self.generations.read();
        let entries = generations.iter().map(|g| g.entry_count()).sum();
        self.stats.snapshot(generations.len() as u64, entries)
    }

    fn snapshot_generations(&self) -> Vec<Arc<MemoryCache>> {
        self.generations.read().clone()
    }
}

impl Default for MemoryCacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        self.stats.increment_opens();
        let mut generations = self.generations.write();
        if let Some(existing) = generations.iter().find(|g| g.name == name) {
            return Ok(existing.clone());
        }
        tracing::debug!(cache = %name, "Creating cache generation");
        let cache = Arc::new(MemoryCache::new(name, self.stats.clone()));
        generations.push(cache.clone());
        Ok(cache)
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.generations.read().iter().any(|g| g.name == name))
    }

    async fn list_generations(&self) -> Result<Vec<String>, CacheError> {
        Ok(self
            .generations
            .read()
            .iter()
            .map(|g| g.name.clone())
            .collect())
    }

    async fn delete_generation(&self, name: &str) -> Result<bool, CacheError> {
        let removed = {
            let mut generations = self.generations.write();
            let before = generations.len();
            generations.retain(|g| g.name != name);
            generations.len() < before
        };
        if removed {
            self.stats.increment_deletes();
        }
        Ok(removed)
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError> {
        // Snapshot first so no lock is held across the awaits below
        for generation in self.snapshot_generations() {
            if let Some(found) = generation.get_entry(key).await {
                self.stats.record_lookup(true);
                return Ok(Some(found));
            }
        }
        self.stats.record_lookup(false);
        Ok(None)
    }
}
