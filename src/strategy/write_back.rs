//! Background store writes.
//!
//! Strategies hand a response to the queue and return immediately; the write
//! runs as its own tokio task. A failed write is logged and counted, never
//! surfaced to the request that produced it.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::cache::{CacheStorage, RequestKey, StoredResponse};
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct WriteBackQueue {
    storage: Arc<dyn CacheStorage>,
    cache_name: Arc<str>,
    metrics: Arc<Metrics>,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl WriteBackQueue {
    /// Queue writing into the generation named `cache_name`
    pub fn new(storage: Arc<dyn CacheStorage>, cache_name: &str, metrics: Arc<Metrics>) -> Self {
        Self {
            storage,
            cache_name: Arc::from(cache_name),
            metrics,
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Schedule a write. Must be called from within a tokio runtime.
    pub fn schedule(&self, key: RequestKey, response: StoredResponse) {
        let storage = self.storage.clone();
        let cache_name = self.cache_name.clone();
        let metrics = self.metrics.clone();

        let mut tasks = self.tasks.lock();
        // Reap finished writes so the set only holds in-flight ones
        while tasks.try_join_next().is_some() {}

        tasks.spawn(async move {
            let result = match storage.open(&cache_name).await {
                Ok(cache) => cache.put(key.clone(), response).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => tracing::debug!(cache = %cache_name, key = %key, "Stored response"),
                Err(e) => {
                    metrics.record_store_write_failure();
                    tracing::warn!(
                        cache = %cache_name,
                        key = %key,
                        error = %e,
                        "Store write failed, response discarded"
                    );
                }
            }
        });
    }

    /// Number of writes scheduled and not yet joined
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Wait for every scheduled write, including ones scheduled while waiting
    pub async fn flush(&self) {
        loop {
            let mut batch = std::mem::take(&mut *self.tasks.lock());
            if batch.is_empty() {
                return;
            }
            while let Some(joined) = batch.join_next().await {
                if let Err(e) = joined {
                    self.metrics.record_store_write_failure();
                    tracing::error!(error = %e, "Store write task panicked");
                }
            }
        }
    }
}
