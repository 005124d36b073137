//! Static assets: the store answers first, the network fills misses.

use async_trait::async_trait;

use super::{fallback, Strategy, StrategyContext};
use crate::fetch::CacheMode;
use crate::http::{Request, Response};

pub struct CacheFirst;

#[async_trait]
impl Strategy for CacheFirst {
    fn name(&self) -> &'static str {
        "cache_first"
    }

    async fn handle(&self, request: &Request, ctx: &StrategyContext) -> Response {
        let key = ctx.key_for(request);

        if let Some(stored) = ctx.lookup(&key).await {
            tracing::debug!(key = %key, "Served from store");
            return stored.to_response();
        }

        match ctx.fetcher.fetch(request, CacheMode::Default).await {
            Ok(response) if response.is_cacheable() => {
                ctx.store_in_background(key, &response);
                response
            }
            Ok(response) if ctx.settings.pass_through_uncacheable => response,
            Ok(response) => {
                tracing::debug!(
                    url = %request.url(),
                    status = response.status().as_u16(),
                    response_type = ?response.response_type(),
                    "Uncacheable asset response, serving fallback"
                );
                fallback::for_destination(request.destination(), ctx).await
            }
            Err(e) => {
                tracing::info!(url = %request.url(), error = %e, "Asset fetch failed");
                fallback::for_destination(request.destination(), ctx).await
            }
        }
    }
}
