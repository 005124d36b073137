// Strategy module
//
// One strategy per non-abstaining route. Every strategy resolves to a
// concrete Response: network failures end in a stored response, the offline
// page or a synthetic error, never in an Err.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{CacheStorage, RequestKey, StoredResponse};
use crate::config::Settings;
use crate::fetch::Fetcher;
use crate::http::{Request, Response};
use crate::metrics::Metrics;
use crate::router::{AbstainReason, Route};

pub mod cache_first;
pub mod fallback;
pub mod network_first;
pub mod network_only;
pub mod write_back;

pub use cache_first::CacheFirst;
pub use network_first::NetworkFirst;
pub use network_only::NetworkOnly;
pub use write_back::WriteBackQueue;

/// Everything a strategy may touch while serving one request
#[derive(Clone)]
pub struct StrategyContext {
    pub settings: Arc<Settings>,
    pub storage: Arc<dyn CacheStorage>,
    pub fetcher: Arc<dyn Fetcher>,
    pub write_back: WriteBackQueue,
    pub metrics: Arc<Metrics>,
}

impl StrategyContext {
    pub fn new(
        settings: Arc<Settings>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let write_back = WriteBackQueue::new(storage.clone(), &settings.cache_name, metrics.clone());
        Self {
            settings,
            storage,
            fetcher,
            write_back,
            metrics,
        }
    }

    /// Store identity of an intercepted request
    pub fn key_for(&self, request: &Request) -> RequestKey {
        RequestKey::from_request(request, &self.settings.vary_headers)
    }

    /// Look up an identity across every generation. Read failures count as a miss.
    pub async fn lookup(&self, key: &RequestKey) -> Option<StoredResponse> {
        match self.storage.match_any(key).await {
            Ok(found) => {
                self.metrics.record_lookup(found.is_some());
                found
            }
            Err(e) => {
                self.metrics.record_lookup_error();
                tracing::warn!(key = %key, error = %e, "Store read failed, treating as miss");
                None
            }
        }
    }

    /// Write a clone of `response` into the current generation in the background
    pub fn store_in_background(&self, key: RequestKey, response: &Response) {
        self.write_back
            .schedule(key, StoredResponse::from_response(response));
    }
}

#[async_trait]
pub trait Strategy: Send + Sync {
    /// Label used in logs
    fn name(&self) -> &'static str;

    async fn handle(&self, request: &Request, ctx: &StrategyContext) -> Response;
}

/// Strategy serving `route`, or the reason the worker abstains
pub fn for_route(route: Route) -> Result<&'static dyn Strategy, AbstainReason> {
    match route {
        Route::Abstain(reason) => Err(reason),
        Route::NetworkOnly => Ok(&NetworkOnly),
        Route::NetworkFirst => Ok(&NetworkFirst),
        Route::CacheFirst => Ok(&CacheFirst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_route_maps_each_route() {
        assert_eq!(
            for_route(Route::Abstain(AbstainReason::UntrustedOrigin)).err(),
            Some(AbstainReason::UntrustedOrigin)
        );
        assert_eq!(for_route(Route::NetworkOnly).map(|s| s.name()), Ok("network_only"));
        assert_eq!(for_route(Route::NetworkFirst).map(|s| s.name()), Ok("network_first"));
        assert_eq!(for_route(Route::CacheFirst).map(|s| s.name()), Ok("cache_first"));
    }
}
