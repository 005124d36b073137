// Shared test doubles for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use offline_shell::cache::{
    Cache, CacheError, CacheStorage, MemoryCacheStorage, RequestKey, StoredResponse,
};
use offline_shell::config::{Config, Settings};
use offline_shell::fetch::{CacheMode, FetchError, Fetcher};
use offline_shell::http::{Request, Response, ResponseType};
use offline_shell::ServiceWorker;

pub const SCOPE: &str = "https://riep31.github.io/";

pub fn url(path: &str) -> String {
    format!("https://riep31.github.io/{}", path.trim_start_matches("./"))
}

mockall::mock! {
    pub Network {}

    #[async_trait]
    impl Fetcher for Network {
        async fn fetch(&self, request: &Request, mode: CacheMode) -> Result<Response, FetchError>;
    }
}

#[derive(Clone)]
enum Reply {
    Respond {
        status: StatusCode,
        body: &'static str,
        content_type: &'static str,
        response_type: ResponseType,
    },
    Fail,
}

/// Fetcher answering from a URL table.
///
/// Unknown URLs fail like an unreachable host. `set_offline(true)` fails
/// every request regardless of the table.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, CacheMode)>>,
    offline: AtomicBool,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve 200 for every default manifest asset
    pub fn with_manifest() -> Self {
        let fetcher = Self::new();
        let settings = Settings::from_config(&Config::default()).unwrap();
        for asset in &settings.precache_urls {
            let content_type = if asset.path().ends_with(".png") {
                "image/png"
            } else if asset.path().ends_with(".json") {
                "application/manifest+json"
            } else {
                "text/html"
            };
            fetcher.serve_as(asset.as_str(), StatusCode::OK, "precached", content_type);
        }
        fetcher
    }

    pub fn serve(&self, url: &str, status: StatusCode, body: &'static str) {
        self.serve_as(url, status, body, "text/plain");
    }

    pub fn serve_as(
        &self,
        url: &str,
        status: StatusCode,
        body: &'static str,
        content_type: &'static str,
    ) {
        self.serve_typed(url, status, body, content_type, ResponseType::Basic);
    }

    pub fn serve_typed(
        &self,
        url: &str,
        status: StatusCode,
        body: &'static str,
        content_type: &'static str,
        response_type: ResponseType,
    ) {
        self.replies.lock().insert(
            url.to_string(),
            Reply::Respond {
                status,
                body,
                content_type,
                response_type,
            },
        );
    }

    pub fn fail(&self, url: &str) {
        self.replies.lock().insert(url.to_string(), Reply::Fail);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|(u, _)| u == url).count()
    }

    pub fn last_mode(&self) -> Option<CacheMode> {
        self.calls.lock().last().map(|(_, mode)| *mode)
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request, mode: CacheMode) -> Result<Response, FetchError> {
        let url = request.url().to_string();
        self.calls.lock().push((url.clone(), mode));

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Network("offline".to_string()));
        }

        let reply = self.replies.lock().get(&url).cloned();
        match reply {
            Some(Reply::Respond {
                status,
                body,
                content_type,
                response_type,
            }) => Ok(Response::new(status)
                .header(CONTENT_TYPE, HeaderValue::from_static(content_type))
                .body(body)
                .with_url(request.url().clone())
                .with_type(response_type)),
            Some(Reply::Fail) | None => Err(FetchError::Network(format!(
                "failed to connect to {}",
                url
            ))),
        }
    }
}

/// Cache wrapper whose writes can be switched to fail
struct FlakyCache {
    inner: Arc<dyn Cache>,
    fail_writes: Arc<AtomicBool>,
}

#[async_trait]
impl Cache for FlakyCache {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn match_request(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError> {
        self.inner.match_request(key).await
    }

    async fn put(&self, key: RequestKey, response: StoredResponse) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("quota exceeded".to_string()));
        }
        self.inner.put(key, response).await
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool, CacheError> {
        self.inner.delete(key).await
    }

    async fn keys(&self) -> Result<Vec<RequestKey>, CacheError> {
        self.inner.keys().await
    }
}

/// Memory storage with switchable write and delete failures
#[derive(Default)]
pub struct FlakyStorage {
    pub inner: MemoryCacheStorage,
    fail_writes: Arc<AtomicBool>,
    fail_reads: AtomicBool,
    fail_delete_of: Mutex<Option<String>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, name: &str) {
        *self.fail_delete_of.lock() = Some(name.to_string());
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        let inner = self.inner.open(name).await?;
        Ok(Arc::new(FlakyCache {
            inner,
            fail_writes: self.fail_writes.clone(),
        }))
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        self.inner.has(name).await
    }

    async fn list_generations(&self) -> Result<Vec<String>, CacheError> {
        self.inner.list_generations().await
    }

    async fn delete_generation(&self, name: &str) -> Result<bool, CacheError> {
        if self.fail_delete_of.lock().as_deref() == Some(name) {
            return Err(CacheError::Backend(format!("{} is locked", name)));
        }
        self.inner.delete_generation(name).await
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("store unavailable".to_string()));
        }
        self.inner.match_any(key).await
    }
}

/// Default-config worker on memory storage, installed and activated
pub async fn active_worker(
    storage: Arc<MemoryCacheStorage>,
    fetcher: Arc<ScriptedFetcher>,
) -> ServiceWorker {
    let worker = ServiceWorker::new(&Config::default(), storage, fetcher.clone()).unwrap();
    worker.install().await.unwrap();
    worker.activate().await.unwrap();
    fetcher.reset_calls();
    worker
}

/// Put a response straight into a named generation
pub async fn seed(storage: &dyn CacheStorage, generation: &str, url: &str, body: &'static str) {
    let cache = storage.open(generation).await.unwrap();
    let response = Response::new(StatusCode::OK)
        .header(CONTENT_TYPE, HeaderValue::from_static("text/html"))
        .body(body)
        .with_type(ResponseType::Basic);
    cache
        .put(
            RequestKey::get(&url::Url::parse(url).unwrap()),
            StoredResponse::from_response(&response),
        )
        .await
        .unwrap();
}
