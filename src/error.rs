// Error types module

use thiserror::Error;

use crate::cache::CacheError;
use crate::fetch::FetchError;
use crate::lifecycle::LifecycleError;

/// Top-level error for building and driving a worker.
///
/// Request handling never produces one: every fetch ends in a response or an
/// abstention. These come from startup and lifecycle events.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Configuration errors (invalid YAML, missing env vars, bad URLs, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Metric registration failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
