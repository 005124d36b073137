//! `reqwest`-backed fetcher.
//!
//! reqwest 0.11 is built on `http` 0.2 while the rest of the crate uses
//! `http` 1.x, so methods, statuses and headers cross the boundary as
//! strings and bytes.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CACHE_CONTROL, PRAGMA};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::time::Duration;
use url::Url;

use super::{CacheMode, FetchError, Fetcher};
use crate::config::NetworkConfig;
use crate::http::{Request, RequestMode, Response, ResponseType};

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    page_origin: String,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher for a worker whose page lives at `page_origin`.
    ///
    /// The origin decides whether responses are typed `basic`, `cors` or
    /// `opaque`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidRequest` if the HTTP client cannot be
    /// built (e.g. TLS backend initialisation failure).
    pub fn new(config: &NetworkConfig, page_origin: impl Into<String>) -> Result<Self, FetchError> {
        let timeout = config.timeout_seconds.map(Duration::from_secs);

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            FetchError::InvalidRequest(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            page_origin: page_origin.into(),
            timeout,
        })
    }

    fn response_type(&self, request: &Request) -> ResponseType {
        if request.origin() == self.page_origin {
            ResponseType::Basic
        } else if request.mode() == RequestMode::NoCors {
            ResponseType::Opaque
        } else {
            ResponseType::Cors
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Network(err.to_string()),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request, mode: CacheMode) -> Result<Response, FetchError> {
        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        let mut builder = self.client.request(method, request.url().as_str());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
        if mode == CacheMode::NoStore {
            builder = builder
                .header(CACHE_CONTROL.as_str(), "no-store")
                .header(PRAGMA.as_str(), "no-cache");
        }

        tracing::debug!(url = %request.url(), cache_mode = ?mode, "Fetching from network");

        let upstream = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .map_err(|e| FetchError::Network(format!("Invalid upstream status: {}", e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in upstream.headers() {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                headers.append(name, value);
            }
        }

        let final_url = Url::parse(upstream.url().as_str()).ok();

        let body: Bytes = upstream.bytes().await.map_err(|e| self.map_send_error(e))?;

        Ok(Response::from_parts(
            status,
            headers,
            body,
            final_url,
            self.response_type(request),
        ))
    }
}
