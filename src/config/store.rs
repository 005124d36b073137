//! Store behaviour configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Request headers that are part of the request identity
    #[serde(default)]
    pub vary_headers: Vec<String>,
    /// Cache-first: return non-200/opaque network responses as-is instead of
    /// the offline fallback
    #[serde(default)]
    pub pass_through_uncacheable: bool,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        for name in &self.vary_headers {
            http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("cache.vary_headers entry '{}' is not a header name", name))?;
        }
        Ok(())
    }
}
