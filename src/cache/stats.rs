//! Cache statistics types
//!
//! Operation counters for the cache store. They double as the evidence that a
//! request path never touched the store (every counter stays at zero).

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cache store activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of generation opens
    pub opens: u64,
    /// Number of identity lookups (a cross-generation lookup counts once)
    pub lookups: u64,
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Number of successful puts
    pub writes: u64,
    /// Number of entry and generation deletions
    pub deletes: u64,
    /// Current number of generations
    pub generations: u64,
    /// Current number of stored entries across all generations
    pub entries: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / lookups)
    /// Returns 0.0 if there were no lookups
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }

    /// Reads plus writes plus opens; zero means the store was never touched
    pub fn total_operations(&self) -> u64 {
        self.opens + self.lookups + self.writes + self.deletes
    }
}

/// Statistics tracker using atomics for thread safety
#[derive(Debug, Default)]
pub(crate) struct CacheStatsTracker {
    opens: AtomicU64,
    lookups: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl CacheStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_opens(&self) {
        self.opens.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one lookup and its outcome
    pub fn record_lookup(&self, hit: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_writes(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics
    pub fn snapshot(&self, generations: u64, entries: u64) -> CacheStats {
        CacheStats {
            opens: self.opens.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            generations,
            entries,
        }
    }
}
