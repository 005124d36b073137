// Metrics module - Prometheus metrics for the interception layer
//
// Each worker owns its own Registry so several workers (and parallel tests)
// never share counters.

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::router::Route;

/// Fallback kinds recorded by the strategies
pub mod fallback {
    /// A stored response served after a network failure
    pub const CACHED_RESPONSE: &str = "cached_response";
    pub const OFFLINE_PAGE: &str = "offline_page";
    /// Offline page missing from the store; built in-process
    pub const SYNTHETIC_OFFLINE_PAGE: &str = "synthetic_offline_page";
    pub const PLACEHOLDER_IMAGE: &str = "placeholder_image";
    /// Live-data endpoint unreachable; JSON 503 returned
    pub const LIVE_DATA_UNAVAILABLE: &str = "live_data_unavailable";
}

/// Lifecycle events recorded by the lifecycle manager
pub mod lifecycle_event {
    pub const INSTALLED: &str = "installed";
    pub const INSTALL_FAILED: &str = "install_failed";
    pub const ACTIVATED: &str = "activated";
    pub const GENERATION_DELETED: &str = "generation_deleted";
    pub const CACHE_CLEARED: &str = "cache_cleared";
    pub const SKIP_WAITING: &str = "skip_waiting";
    pub const CLIENTS_CLAIMED: &str = "clients_claimed";
}

pub struct Metrics {
    registry: Registry,
    fetch_routed: IntCounterVec,
    cache_lookups: IntCounterVec,
    fallbacks: IntCounterVec,
    store_write_failures: IntCounter,
    lifecycle_events: IntCounterVec,
    generations: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("offline_shell".to_string()), None)?;

        let fetch_routed = IntCounterVec::new(
            Opts::new("fetch_routed_total", "Intercepted fetches by selected route"),
            &["route"], // abstain, network_only, network_first, cache_first
        )?;
        let cache_lookups = IntCounterVec::new(
            Opts::new("cache_lookups_total", "Store lookups made by strategies"),
            &["result"], // hit, miss, error
        )?;
        let fallbacks = IntCounterVec::new(
            Opts::new("fallbacks_total", "Degraded responses served, by kind"),
            &["kind"],
        )?;
        let store_write_failures = IntCounter::new(
            "store_write_failures_total",
            "Background store writes that failed and were discarded",
        )?;
        let lifecycle_events = IntCounterVec::new(
            Opts::new("lifecycle_events_total", "Install/activate lifecycle events"),
            &["event"],
        )?;
        let generations = IntGauge::new(
            "cache_generations",
            "Cache generations present after the last lifecycle operation",
        )?;

        registry.register(Box::new(fetch_routed.clone()))?;
        registry.register(Box::new(cache_lookups.clone()))?;
        registry.register(Box::new(fallbacks.clone()))?;
        registry.register(Box::new(store_write_failures.clone()))?;
        registry.register(Box::new(lifecycle_events.clone()))?;
        registry.register(Box::new(generations.clone()))?;

        Ok(Self {
            registry,
            fetch_routed,
            cache_lookups,
            fallbacks,
            store_write_failures,
            lifecycle_events,
            generations,
        })
    }

    pub fn record_route(&self, route: &Route) {
        self.fetch_routed.with_label_values(&[route.as_str()]).inc();
    }

    pub fn record_lookup(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.cache_lookups.with_label_values(&[result]).inc();
    }

    /// A store read failed and was treated as a miss
    pub fn record_lookup_error(&self) {
        self.cache_lookups.with_label_values(&["error"]).inc();
    }

    pub fn record_fallback(&self, kind: &str) {
        self.fallbacks.with_label_values(&[kind]).inc();
    }

    pub fn record_store_write_failure(&self) {
        self.store_write_failures.inc();
    }

    pub fn record_lifecycle_event(&self, event: &str) {
        self.lifecycle_events.with_label_values(&[event]).inc();
    }

    pub fn set_generations(&self, count: usize) {
        self.generations.set(count as i64);
    }

    pub fn route_count(&self, route: &str) -> u64 {
        self.fetch_routed.with_label_values(&[route]).get()
    }

    pub fn lookup_count(&self, result: &str) -> u64 {
        self.cache_lookups.with_label_values(&[result]).get()
    }

    pub fn fallback_count(&self, kind: &str) -> u64 {
        self.fallbacks.with_label_values(&[kind]).get()
    }

    pub fn store_write_failure_count(&self) -> u64 {
        self.store_write_failures.get()
    }

    pub fn lifecycle_event_count(&self, event: &str) -> u64 {
        self.lifecycle_events.with_label_values(&[event]).get()
    }

    pub fn generations(&self) -> i64 {
        self.generations.get()
    }

    /// Render every metric in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
