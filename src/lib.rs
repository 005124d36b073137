// Offline Shell Library
//
// Request interception and caching layer for an installable web app: picks a
// caching strategy per request, keeps versioned cache generations, and always
// answers with a response or an explicit abstention.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod notification;
pub mod router;
pub mod security;
pub mod strategy;
pub mod worker;

pub use error::WorkerError;
pub use worker::{FetchOutcome, ServiceWorker};
