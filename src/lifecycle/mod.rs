// Lifecycle module
//
// Owns cache versioning. Install fills the current generation from the asset
// manifest, activate deletes every other generation and claims open clients.
// State only moves forward: Parsed -> Installing -> Installed -> Activating
// -> Activated, or Installing -> Redundant when install fails.

use futures::future::join_all;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{CacheError, CacheStorage, RequestKey, StoredResponse};
use crate::config::Settings;
use crate::fetch::{CacheMode, Fetcher};
use crate::http::{Request, Response};
use crate::metrics::{lifecycle_event, Metrics};

pub mod clients;
pub mod messages;

pub use clients::{Client, ClientRegistry};
pub use messages::ControlMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A manifest asset could not be fetched or stored
    #[error("Install failed on {url}: {reason}")]
    Install { url: String, reason: String },

    #[error("Invalid worker state: expected {expected}, found {actual}")]
    InvalidState {
        expected: WorkerState,
        actual: WorkerState,
    },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub struct LifecycleManager {
    settings: Arc<Settings>,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<ClientRegistry>,
    metrics: Arc<Metrics>,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
}

impl LifecycleManager {
    pub fn new(
        settings: Arc<Settings>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<ClientRegistry>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let skip_waiting = AtomicBool::new(settings.skip_waiting_on_install);
        Self {
            settings,
            storage,
            fetcher,
            clients,
            metrics,
            state: RwLock::new(WorkerState::Parsed),
            skip_waiting,
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    pub fn is_activated(&self) -> bool {
        self.state() == WorkerState::Activated
    }

    pub fn cache_name(&self) -> &str {
        &self.settings.cache_name
    }

    /// Move `from` -> `to`, failing if another transition got there first
    fn transition(&self, from: WorkerState, to: WorkerState) -> Result<(), LifecycleError> {
        let mut state = self.state.write();
        if *state != from {
            return Err(LifecycleError::InvalidState {
                expected: from,
                actual: *state,
            });
        }
        tracing::debug!(from = %from, to = %to, "Worker state transition");
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) {
        *self.state.write() = to;
    }

    async fn record_generation_count(&self) {
        if let Ok(names) = self.storage.list_generations().await {
            self.metrics.set_generations(names.len());
        }
    }

    /// Pre-populate the current generation with every manifest asset.
    ///
    /// All assets are fetched before anything is stored, so a failing asset
    /// leaves no partial generation behind.
    pub async fn install(&self) -> Result<(), LifecycleError> {
        self.transition(WorkerState::Parsed, WorkerState::Installing)?;
        let cache_name = self.settings.cache_name.clone();
        tracing::info!(cache = %cache_name, assets = self.settings.precache_urls.len(), "Installing");

        let existed = match self.storage.has(&cache_name).await {
            Ok(existed) => existed,
            // Unknown whether the generation predates us, so leave it alone
            Err(e) => return Err(self.fail_install(true, cache_name.clone(), e.to_string()).await),
        };

        match self.precache(&cache_name).await {
            Ok(()) => {
                self.set_state(WorkerState::Installed);
                self.metrics.record_lifecycle_event(lifecycle_event::INSTALLED);
                self.record_generation_count().await;
                tracing::info!(cache = %cache_name, "Installed");
            }
            Err((url, reason)) => return Err(self.fail_install(existed, url, reason).await),
        }

        if self.skip_waiting.load(Ordering::SeqCst) {
            self.activate().await?;
        }
        Ok(())
    }

    async fn precache(&self, cache_name: &str) -> Result<(), (String, String)> {
        let fetches = self.settings.precache_urls.iter().map(|url| async move {
            let request = Request::new(http::Method::GET, url.clone());
            (url, self.fetcher.fetch(&request, CacheMode::Default).await)
        });

        let mut assets: Vec<(RequestKey, Response)> = Vec::with_capacity(self.settings.precache_urls.len());
        for (url, result) in join_all(fetches).await {
            match result {
                Ok(response) if response.ok() => assets.push((RequestKey::get(url), response)),
                Ok(response) => {
                    return Err((url.to_string(), format!("HTTP status {}", response.status())))
                }
                Err(e) => return Err((url.to_string(), e.to_string())),
            }
        }

        let cache = self
            .storage
            .open(cache_name)
            .await
            .map_err(|e| (cache_name.to_string(), e.to_string()))?;
        for (key, response) in assets {
            let url = key.url.clone();
            cache
                .put(key, StoredResponse::from_response(&response))
                .await
                .map_err(|e| (url, e.to_string()))?;
        }
        Ok(())
    }

    async fn fail_install(&self, existed: bool, url: String, reason: String) -> LifecycleError {
        let cache_name = &self.settings.cache_name;
        tracing::error!(cache = %cache_name, url = %url, reason = %reason, "Install failed");

        if !existed {
            if let Err(e) = self.storage.delete_generation(cache_name).await {
                tracing::warn!(cache = %cache_name, error = %e, "Could not remove partial generation");
            }
        }
        self.set_state(WorkerState::Redundant);
        self.metrics.record_lifecycle_event(lifecycle_event::INSTALL_FAILED);
        self.record_generation_count().await;
        LifecycleError::Install { url, reason }
    }

    /// Delete every stale generation and claim open clients.
    /// Calling it on a worker that is already activating or active is a no-op.
    pub async fn activate(&self) -> Result<(), LifecycleError> {
        if matches!(
            self.state(),
            WorkerState::Activating | WorkerState::Activated
        ) {
            return Ok(());
        }
        self.transition(WorkerState::Installed, WorkerState::Activating)?;

        let names = match self.storage.list_generations().await {
            Ok(names) => names,
            Err(e) => {
                self.set_state(WorkerState::Installed);
                return Err(e.into());
            }
        };

        let current = &self.settings.cache_name;
        for name in names.iter().filter(|n| *n != current) {
            match self.storage.delete_generation(name).await {
                Ok(true) => {
                    self.metrics.record_lifecycle_event(lifecycle_event::GENERATION_DELETED);
                    tracing::info!(cache = %name, "Deleted stale cache generation");
                }
                Ok(false) => tracing::debug!(cache = %name, "Stale generation already gone"),
                Err(e) => {
                    tracing::warn!(cache = %name, error = %e, "Failed to delete stale generation")
                }
            }
        }

        let claimed = self.clients.claim();
        self.metrics.record_lifecycle_event(lifecycle_event::CLIENTS_CLAIMED);

        self.set_state(WorkerState::Activated);
        self.metrics.record_lifecycle_event(lifecycle_event::ACTIVATED);
        self.record_generation_count().await;
        tracing::info!(cache = %current, clients_claimed = claimed, "Activated");
        Ok(())
    }

    /// Activate as soon as install completes; activates now if already installed
    pub async fn skip_waiting(&self) -> Result<(), LifecycleError> {
        self.skip_waiting.store(true, Ordering::SeqCst);
        self.metrics.record_lifecycle_event(lifecycle_event::SKIP_WAITING);
        if self.state() == WorkerState::Installed {
            self.activate().await?;
        }
        Ok(())
    }

    /// Delete every generation, current included. Returns how many were deleted.
    pub async fn clear_cache(&self) -> Result<usize, LifecycleError> {
        let names = self.storage.list_generations().await?;
        let mut deleted = 0;
        for name in &names {
            match self.storage.delete_generation(name).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(cache = %name, error = %e, "Failed to delete generation"),
            }
        }
        self.metrics.record_lifecycle_event(lifecycle_event::CACHE_CLEARED);
        self.record_generation_count().await;
        tracing::info!(deleted, "Cleared all cache generations");
        Ok(deleted)
    }

    /// Apply a posted control message. Unrecognised messages are ignored.
    pub async fn handle_message(&self, value: &serde_json::Value) -> Result<(), LifecycleError> {
        match ControlMessage::parse(value) {
            Some(ControlMessage::SkipWaiting) => self.skip_waiting().await,
            Some(ControlMessage::ClearCache) => self.clear_cache().await.map(|_| ()),
            None => Ok(()),
        }
    }
}
