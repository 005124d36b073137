//! Request identity and stored response types
//!
//! This module defines the core store structures:
//! - `RequestKey`: identity of a request (method + URL + variance headers)
//! - `StoredResponse`: immutable snapshot of a network response

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use url::Url;

use crate::http::{Request, Response, ResponseType};

/// Store key identifying a request.
/// Two requests with equal keys are served the same stored response.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestKey {
    /// HTTP method, uppercase
    pub method: String,
    /// Absolute URL without its fragment
    pub url: String,
    /// (lowercase header name, value) pairs for the configured variance
    /// headers the request actually carries, sorted by name. A request with
    /// none of them keys the same as [`RequestKey::get`].
    pub vary: Vec<(String, String)>,
}

impl RequestKey {
    /// Key for a plain GET of `url`, as used for precached assets and fallbacks
    pub fn get(url: &Url) -> Self {
        Self {
            method: Method::GET.as_str().to_string(),
            url: normalize_url(url),
            vary: Vec::new(),
        }
    }

    /// Key for an intercepted request, varying on the given header names
    pub fn from_request(request: &Request, vary_headers: &[String]) -> Self {
        let mut vary: Vec<(String, String)> = vary_headers
            .iter()
            .filter_map(|name| {
                let name = name.to_ascii_lowercase();
                let value = request.headers().get(name.as_str())?.to_str().ok()?;
                Some((name, value.to_string()))
            })
            .collect();
        vary.sort();
        vary.dedup_by(|a, b| a.0 == b.0);

        Self {
            method: request.method().as_str().to_string(),
            url: normalize_url(request.url()),
            vary,
        }
    }

    /// Only GET identities can be stored
    pub fn is_get(&self) -> bool {
        self.method == Method::GET.as_str()
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if !self.vary.is_empty() {
            let pairs: Vec<String> = self
                .vary
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, " [{}]", pairs.join(", "))?;
        }
        Ok(())
    }
}

/// Fragments never reach the network, so they are not part of the identity
fn normalize_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Snapshot of a network response held in one cache generation
#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Final URL of the response, if the network reported one
    pub url: Option<Url>,
    pub response_type: ResponseType,
    /// When this snapshot was written
    pub stored_at: SystemTime,
}

impl StoredResponse {
    /// Snapshot a response. The body buffer is shared, not copied.
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            body: response.body_bytes().clone(),
            url: response.url().cloned(),
            response_type: response.response_type(),
            stored_at: SystemTime::now(),
        }
    }

    /// Materialize a response to hand back to the caller
    pub fn to_response(&self) -> Response {
        Response::from_parts(
            self.status,
            self.headers.clone(),
            self.body.clone(),
            self.url.clone(),
            self.response_type,
        )
    }

    /// Approximate size in bytes (body plus header names and values)
    pub fn size_bytes(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len())
            .sum();
        self.body.len() + headers
    }
}

impl From<&Response> for StoredResponse {
    fn from(response: &Response) -> Self {
        Self::from_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{ACCEPT, CONTENT_TYPE};
    use http::HeaderValue;

    #[test]
    fn test_get_key_strips_fragment() {
        let url = Url::parse("https://riep31.github.io/index.html#top").unwrap();
        let key = RequestKey::get(&url);
        assert_eq!(key.method, "GET");
        assert_eq!(key.url, "https://riep31.github.io/index.html");
        assert!(key.vary.is_empty());
    }

    #[test]
    fn test_request_key_matches_plain_get_key_without_vary() {
        // Test: a fallback lookup by URL finds what a request stored
        let request = Request::navigate("https://riep31.github.io/offline.html").unwrap();
        let from_request = RequestKey::from_request(&request, &[]);
        let by_url = RequestKey::get(request.url());
        assert_eq!(from_request, by_url);
    }

    #[test]
    fn test_vary_headers_distinguish_keys() {
        let html = Request::get("https://riep31.github.io/data")
            .unwrap()
            .with_header(ACCEPT, HeaderValue::from_static("text/html"));
        let json = Request::get("https://riep31.github.io/data")
            .unwrap()
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));
        let vary = vec!["Accept".to_string()];

        assert_ne!(
            RequestKey::from_request(&html, &vary),
            RequestKey::from_request(&json, &vary)
        );
        // Without variance both requests share one identity
        assert_eq!(
            RequestKey::from_request(&html, &[]),
            RequestKey::from_request(&json, &[])
        );
    }

    #[test]
    fn test_absent_vary_header_is_left_out() {
        // Test: a request without the variance headers matches the precache key
        let request = Request::get("https://riep31.github.io/manifest.json").unwrap();
        let key = RequestKey::from_request(&request, &["X-Tenant".to_string()]);
        assert!(key.vary.is_empty());
        assert_eq!(key, RequestKey::get(request.url()));
    }

    #[test]
    fn test_only_present_vary_headers_are_recorded() {
        let request = Request::get("https://riep31.github.io/data")
            .unwrap()
            .with_header(ACCEPT, HeaderValue::from_static("text/html"));
        let vary = vec!["X-Tenant".to_string(), "Accept".to_string()];
        let key = RequestKey::from_request(&request, &vary);
        assert_eq!(key.vary, vec![("accept".to_string(), "text/html".to_string())]);
    }

    #[test]
    fn test_is_get() {
        let request = Request::get("https://riep31.github.io/api")
            .unwrap()
            .with_method(Method::POST);
        assert!(!RequestKey::from_request(&request, &[]).is_get());
        assert!(RequestKey::get(request.url()).is_get());
    }

    #[test]
    fn test_display_format() {
        let url = Url::parse("https://riep31.github.io/").unwrap();
        assert_eq!(
            RequestKey::get(&url).to_string(),
            "GET https://riep31.github.io/"
        );

        let key = RequestKey {
            method: "GET".to_string(),
            url: "https://riep31.github.io/".to_string(),
            vary: vec![("accept".to_string(), "text/html".to_string())],
        };
        assert_eq!(
            key.to_string(),
            "GET https://riep31.github.io/ [accept=text/html]"
        );
    }

    #[test]
    fn test_stored_response_round_trips_response_fields() {
        let url = Url::parse("https://riep31.github.io/index.html").unwrap();
        let response = Response::new(StatusCode::OK)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/html"))
            .body("<h1>hi</h1>")
            .with_url(url.clone())
            .with_type(ResponseType::Basic);

        let stored = StoredResponse::from(&response);
        assert_eq!(stored.size_bytes(), "<h1>hi</h1>".len() + "content-type".len() + "text/html".len());

        let restored = stored.to_response();
        assert_eq!(restored.status(), StatusCode::OK);
        assert_eq!(restored.content_type(), Some("text/html"));
        assert_eq!(restored.text(), Some("<h1>hi</h1>"));
        assert_eq!(restored.url(), Some(&url));
        assert_eq!(restored.response_type(), ResponseType::Basic);
    }
}
