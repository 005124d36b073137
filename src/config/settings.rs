//! Resolved runtime settings.
//!
//! `Config` is what the operator writes; `Settings` is what the worker runs
//! on. Relative paths are resolved against the scope once, here, so nothing
//! downstream re-parses URLs. Shared read-only behind an `Arc`.

use url::Url;

use super::Config;
use crate::security::TrustSet;

#[derive(Debug, Clone)]
pub struct Settings {
    pub scope: Url,
    /// ASCII serialization of the scope origin, e.g. `https://riep31.github.io`
    pub page_origin: String,
    /// Name of the current cache generation
    pub cache_name: String,
    pub precache_urls: Vec<Url>,
    pub offline_page: Url,
    pub placeholder_image: Url,
    pub trust_set: TrustSet,
    pub live_data_host: Option<String>,
    pub vary_headers: Vec<String>,
    pub pass_through_uncacheable: bool,
    pub skip_waiting_on_install: bool,
    pub notification_title: String,
    pub notification_body: String,
    pub notification_icon: Url,
    pub notification_vibrate: Vec<u32>,
    pub notification_click_url: Url,
}

fn resolve(scope: &Url, field: &str, path: &str) -> Result<Url, String> {
    scope
        .join(path)
        .map_err(|e| format!("{} '{}' does not resolve against the scope: {}", field, path, e))
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let scope = Url::parse(&config.worker.scope)
            .map_err(|e| format!("worker.scope '{}' is not a valid URL: {}", config.worker.scope, e))?;

        let precache_urls = config
            .precache
            .assets
            .iter()
            .map(|asset| resolve(&scope, "precache.assets entry", asset))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            page_origin: scope.origin().ascii_serialization(),
            cache_name: config.worker.cache_name(),
            precache_urls,
            offline_page: resolve(&scope, "precache.offline_page", &config.precache.offline_page)?,
            placeholder_image: resolve(
                &scope,
                "precache.placeholder_image",
                &config.precache.placeholder_image,
            )?,
            trust_set: TrustSet::new(config.origins.trusted.iter().cloned()),
            live_data_host: config
                .origins
                .live_data_host
                .as_ref()
                .map(|h| h.to_ascii_lowercase()),
            vary_headers: config.cache.vary_headers.clone(),
            pass_through_uncacheable: config.cache.pass_through_uncacheable,
            skip_waiting_on_install: config.worker.skip_waiting_on_install,
            notification_title: config.notification.default_title.clone(),
            notification_body: config.notification.default_body.clone(),
            notification_icon: resolve(&scope, "notification.icon", &config.notification.icon)?,
            notification_vibrate: config.notification.vibrate.clone(),
            notification_click_url: resolve(
                &scope,
                "notification.click_url",
                &config.notification.click_url,
            )?,
            scope,
        })
    }
}
