//! Response type returned from the fetch handler.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

/// Response type as classified by the network layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin network response
    Basic,
    /// Cross-origin response obtained with CORS
    Cors,
    /// Constructed locally rather than received from the network
    #[default]
    Default,
    /// Network error placeholder
    Error,
    /// Cross-origin no-cors response; status and body are not inspectable
    Opaque,
}

/// An HTTP response.
///
/// The body is a [`Bytes`] buffer so clones share the same allocation, which
/// lets a strategy hand one copy to the caller and another to the store.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use offline_shell::http::{Response, ResponseType};
///
/// let response = Response::new(StatusCode::OK).body("hello");
/// assert!(response.ok());
/// assert_eq!(response.response_type(), ResponseType::Default);
/// assert_eq!(response.text(), Some("hello"));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Option<Url>,
    response_type: ResponseType,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            url: None,
            response_type: ResponseType::Default,
        }
    }

    /// Build a response from its parts, as received from a fetcher or the store
    pub fn from_parts(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Option<Url>,
        response_type: ResponseType,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            response_type,
        }
    }

    /// Build a JSON response with `Content-Type: application/json`
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(value.to_string())
    }

    /// Append a header. Multiple values for the same name are preserved.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// True for 2xx statuses
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Only complete, inspectable 200 responses are written to the store
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
            && !matches!(
                self.response_type,
                ResponseType::Opaque | ResponseType::Error
            )
    }
}
