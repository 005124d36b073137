//! Navigations: fresh from the network when possible, stored copy otherwise.

use async_trait::async_trait;
use http::StatusCode;

use super::{fallback, Strategy, StrategyContext};
use crate::fetch::CacheMode;
use crate::http::{Request, Response};
use crate::metrics::fallback as fallback_kind;

pub struct NetworkFirst;

#[async_trait]
impl Strategy for NetworkFirst {
    fn name(&self) -> &'static str {
        "network_first"
    }

    async fn handle(&self, request: &Request, ctx: &StrategyContext) -> Response {
        let key = ctx.key_for(request);

        match ctx.fetcher.fetch(request, CacheMode::Default).await {
            Ok(response) => {
                // Only 200s are written; other statuses pass through untouched
                if response.status() == StatusCode::OK {
                    ctx.store_in_background(key, &response);
                }
                response
            }
            Err(e) => {
                tracing::info!(url = %request.url(), error = %e, "Navigation failed, trying store");
                match ctx.lookup(&key).await {
                    Some(stored) => {
                        ctx.metrics.record_fallback(fallback_kind::CACHED_RESPONSE);
                        stored.to_response()
                    }
                    None => fallback::offline_page(ctx).await,
                }
            }
        }
    }
}
