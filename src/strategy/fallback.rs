//! Degraded responses for when the network is unavailable.

use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};

use super::StrategyContext;
use crate::cache::RequestKey;
use crate::constants::SYNTHETIC_OFFLINE_HTML;
use crate::fetch::FetchError;
use crate::http::{Destination, Response};
use crate::metrics::fallback;

/// The stored offline page, or a built-in one if it is not in the store
pub async fn offline_page(ctx: &StrategyContext) -> Response {
    let key = RequestKey::get(&ctx.settings.offline_page);
    match ctx.lookup(&key).await {
        Some(stored) => {
            ctx.metrics.record_fallback(fallback::OFFLINE_PAGE);
            stored.to_response()
        }
        None => {
            tracing::warn!(
                offline_page = %ctx.settings.offline_page,
                "Offline page is not in the store, serving built-in page"
            );
            ctx.metrics.record_fallback(fallback::SYNTHETIC_OFFLINE_PAGE);
            synthetic_offline_page()
        }
    }
}

/// Image requests get the placeholder icon; everything else the offline page
pub async fn for_destination(destination: Destination, ctx: &StrategyContext) -> Response {
    if destination == Destination::Image {
        let key = RequestKey::get(&ctx.settings.placeholder_image);
        if let Some(stored) = ctx.lookup(&key).await {
            ctx.metrics.record_fallback(fallback::PLACEHOLDER_IMAGE);
            return stored.to_response();
        }
    }
    offline_page(ctx).await
}

pub fn synthetic_offline_page() -> Response {
    Response::new(StatusCode::SERVICE_UNAVAILABLE)
        .header(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))
        .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
        .body(SYNTHETIC_OFFLINE_HTML)
}

/// JSON error returned when the live-data endpoint cannot be reached
pub fn live_data_unavailable(err: &FetchError) -> Response {
    let body = serde_json::json!({
        "error": "Network error",
        "message": err.to_string(),
    });
    Response::json(StatusCode::SERVICE_UNAVAILABLE, &body)
        .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_offline_page_shape() {
        let response = synthetic_offline_page();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
        assert!(response.text().unwrap().contains("Offline"));
        assert!(!response.is_cacheable());
    }

    #[test]
    fn test_live_data_error_body() {
        let response = live_data_unavailable(&FetchError::Network("connection reset".to_string()));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "no-store");

        let body: serde_json::Value = serde_json::from_slice(response.body_bytes()).unwrap();
        assert_eq!(body["error"], "Network error");
        assert!(body["message"].as_str().unwrap().contains("connection reset"));
    }
}
