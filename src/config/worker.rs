//! Worker identity configuration.
//!
//! The scope fixes the page origin and the base every relative asset path is
//! resolved against. Prefix and version together name the current cache
//! generation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION, DEFAULT_SCOPE};

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_cache_prefix() -> String {
    DEFAULT_CACHE_PREFIX.to_string()
}

fn default_cache_version() -> String {
    DEFAULT_CACHE_VERSION.to_string()
}

fn default_skip_waiting_on_install() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Absolute URL of the worker scope (default: https://riep31.github.io/)
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,
    #[serde(default = "default_cache_version")]
    pub version: String,
    /// Activate right after a successful install instead of waiting
    #[serde(default = "default_skip_waiting_on_install")]
    pub skip_waiting_on_install: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            cache_prefix: default_cache_prefix(),
            version: default_cache_version(),
            skip_waiting_on_install: default_skip_waiting_on_install(),
        }
    }
}

impl WorkerConfig {
    /// Name of the current cache generation, e.g. `utilisasi-warehouse-v1.0.0`
    pub fn cache_name(&self) -> String {
        format!("{}-v{}", self.cache_prefix, self.version)
    }

    pub fn validate(&self) -> Result<(), String> {
        let scope = Url::parse(&self.scope)
            .map_err(|e| format!("worker.scope '{}' is not a valid URL: {}", self.scope, e))?;
        if !matches!(scope.scheme(), "http" | "https") {
            return Err(format!(
                "worker.scope '{}' must use http or https",
                self.scope
            ));
        }
        if self.cache_prefix.trim().is_empty() {
            return Err("worker.cache_prefix cannot be empty".to_string());
        }
        if self.version.trim().is_empty() {
            return Err("worker.version cannot be empty".to_string());
        }
        Ok(())
    }
}
