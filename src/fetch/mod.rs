//! Network access for the interception layer.
//!
//! Strategies never talk to `reqwest` directly; they go through the
//! [`Fetcher`] trait so tests can script the network.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::http::{Request, Response};

pub mod http_client;

pub use http_client::HttpFetcher;

/// How the fetch interacts with HTTP caches between us and the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Bypass intermediary caches entirely (`Cache-Control: no-store`,
    /// `Pragma: no-cache`)
    NoStore,
}

/// A fetch that produced no response at all.
///
/// A response with an error status is not a `FetchError`; it is returned as
/// a [`Response`] and the caller decides what to do with it.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request, mode: CacheMode) -> Result<Response, FetchError>;
}
