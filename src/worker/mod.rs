// Worker module
//
// ServiceWorker is the event surface: install, activate, fetch, message,
// push and notification click. It owns the router, the strategies' shared
// context and the lifecycle manager, all built from one resolved Settings.

use std::sync::Arc;
use url::Url;

use crate::cache::CacheStorage;
use crate::config::{Config, Settings};
use crate::error::WorkerError;
use crate::fetch::Fetcher;
use crate::http::{Request, Response};
use crate::lifecycle::{ClientRegistry, LifecycleManager, WorkerState};
use crate::metrics::Metrics;
use crate::notification::{self, Notification};
use crate::router::{AbstainReason, Route, StrategyRouter};
use crate::strategy::{self, StrategyContext};

/// Result of a fetch event
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The worker did not intercept; the request goes to the network as if
    /// no worker existed
    Abstain(AbstainReason),
    Respond(Response),
}

impl FetchOutcome {
    pub fn is_abstain(&self) -> bool {
        matches!(self, FetchOutcome::Abstain(_))
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Respond(response) => Some(response),
            FetchOutcome::Abstain(_) => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Respond(response) => Some(response),
            FetchOutcome::Abstain(_) => None,
        }
    }
}

pub struct ServiceWorker {
    settings: Arc<Settings>,
    router: StrategyRouter,
    context: StrategyContext,
    lifecycle: LifecycleManager,
    clients: Arc<ClientRegistry>,
    metrics: Arc<Metrics>,
}

impl ServiceWorker {
    /// Validate `config` and build a worker in the `parsed` state
    pub fn new(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, WorkerError> {
        config.validate().map_err(WorkerError::Config)?;
        let settings = Arc::new(Settings::from_config(config).map_err(WorkerError::Config)?);
        let metrics = Arc::new(Metrics::new()?);
        let clients = Arc::new(ClientRegistry::new());

        let router = StrategyRouter::from_settings(&settings);
        let context = StrategyContext::new(
            settings.clone(),
            storage.clone(),
            fetcher.clone(),
            metrics.clone(),
        );
        let lifecycle = LifecycleManager::new(
            settings.clone(),
            storage,
            fetcher,
            clients.clone(),
            metrics.clone(),
        );

        Ok(Self {
            settings,
            router,
            context,
            lifecycle,
            clients,
            metrics,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub async fn install(&self) -> Result<(), WorkerError> {
        Ok(self.lifecycle.install().await?)
    }

    pub async fn activate(&self) -> Result<(), WorkerError> {
        Ok(self.lifecycle.activate().await?)
    }

    /// Route and serve one intercepted request
    pub async fn handle_fetch(&self, request: Request) -> FetchOutcome {
        let route = if self.lifecycle.is_activated() {
            self.router.route(&request)
        } else {
            Route::Abstain(AbstainReason::NotActivated)
        };
        self.metrics.record_route(&route);
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            route = %route,
            "Fetch intercepted"
        );

        match strategy::for_route(route) {
            Ok(strategy) => FetchOutcome::Respond(strategy.handle(&request, &self.context).await),
            Err(reason) => FetchOutcome::Abstain(reason),
        }
    }

    /// Handle a message posted by a page
    pub async fn post_message(&self, message: &serde_json::Value) -> Result<(), WorkerError> {
        Ok(self.lifecycle.handle_message(message).await?)
    }

    /// Build the notification to show for a push. Malformed payloads show nothing.
    pub fn handle_push(&self, data: Option<&[u8]>) -> Option<Notification> {
        match notification::from_push(data, &self.settings) {
            Ok(notification) => notification,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping push with malformed payload");
                None
            }
        }
    }

    /// Open the scope root in a new window. Returns the new client's id.
    pub fn handle_notification_click(&self) -> u64 {
        let url = self.settings.notification_click_url.clone();
        tracing::info!(url = %url, "Notification clicked, opening window");
        self.clients.open_window(url, self.lifecycle.is_activated())
    }

    /// Track a page that is open in some window
    pub fn register_client(&self, url: Url) -> u64 {
        self.clients.register(url)
    }

    /// Wait for every pending background store write
    pub async fn flush(&self) {
        self.context.write_back.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStorage;
    use crate::fetch::{CacheMode, FetchError};
    use async_trait::async_trait;

    struct OfflineFetcher;

    #[async_trait]
    impl Fetcher for OfflineFetcher {
        async fn fetch(&self, _request: &Request, _mode: CacheMode) -> Result<Response, FetchError> {
            Err(FetchError::Network("offline".to_string()))
        }
    }

    fn worker() -> ServiceWorker {
        ServiceWorker::new(
            &Config::default(),
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(OfflineFetcher),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_before_activation_abstains() {
        let worker = worker();
        let outcome = worker
            .handle_fetch(Request::get("https://riep31.github.io/css/style.css").unwrap())
            .await;
        assert!(matches!(
            outcome,
            FetchOutcome::Abstain(AbstainReason::NotActivated)
        ));
        assert_eq!(worker.metrics().route_count("abstain"), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.precache.assets = vec![];
        let result = ServiceWorker::new(
            &config,
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(OfflineFetcher),
        );
        assert!(matches!(result, Err(WorkerError::Config(_))));
    }

    #[tokio::test]
    async fn test_install_failure_surfaces_as_lifecycle_error() {
        let worker = worker();
        let err = worker.install().await.unwrap_err();
        assert!(matches!(err, WorkerError::Lifecycle(_)));
        assert_eq!(worker.state(), WorkerState::Redundant);
    }

    #[test]
    fn test_notification_click_opens_scope_root() {
        let worker = worker();
        let id = worker.handle_notification_click();
        let client = worker.clients().get(id).unwrap();
        assert_eq!(client.url.as_str(), "https://riep31.github.io/");
        // Not active yet, so the new window is not controlled
        assert!(!client.controlled);
    }

    #[test]
    fn test_malformed_push_shows_nothing() {
        assert!(worker().handle_push(Some(b"{broken")).is_none());
    }
}
