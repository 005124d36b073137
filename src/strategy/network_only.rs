//! Live data: straight to the network, bypassing every cache on the way.

use async_trait::async_trait;

use super::{fallback, Strategy, StrategyContext};
use crate::fetch::CacheMode;
use crate::http::{Request, Response};
use crate::metrics::fallback as fallback_kind;

pub struct NetworkOnly;

#[async_trait]
impl Strategy for NetworkOnly {
    fn name(&self) -> &'static str {
        "network_only"
    }

    async fn handle(&self, request: &Request, ctx: &StrategyContext) -> Response {
        match ctx.fetcher.fetch(request, CacheMode::NoStore).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %request.url(), error = %e, "Live data fetch failed");
                ctx.metrics.record_fallback(fallback_kind::LIVE_DATA_UNAVAILABLE);
                fallback::live_data_unavailable(&e)
            }
        }
    }
}
