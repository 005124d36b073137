//! Asset manifest configuration.
//!
//! Paths are relative to the worker scope. The offline page and the
//! placeholder image are served from the store as fallbacks, so both must be
//! part of the manifest.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OFFLINE_PAGE, DEFAULT_PLACEHOLDER_IMAGE, DEFAULT_PRECACHE_ASSETS};

fn default_assets() -> Vec<String> {
    DEFAULT_PRECACHE_ASSETS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_offline_page() -> String {
    DEFAULT_OFFLINE_PAGE.to_string()
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecacheConfig {
    /// Ordered asset manifest, fetched during install
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
    #[serde(default = "default_offline_page")]
    pub offline_page: String,
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

impl Default for PrecacheConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            offline_page: default_offline_page(),
            placeholder_image: default_placeholder_image(),
        }
    }
}

impl PrecacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.assets.is_empty() {
            return Err("precache.assets cannot be empty".to_string());
        }
        if let Some(blank) = self.assets.iter().position(|a| a.trim().is_empty()) {
            return Err(format!("precache.assets[{}] is empty", blank));
        }
        if !self.assets.contains(&self.offline_page) {
            return Err(format!(
                "precache.offline_page '{}' must be listed in precache.assets",
                self.offline_page
            ));
        }
        if !self.assets.contains(&self.placeholder_image) {
            return Err(format!(
                "precache.placeholder_image '{}' must be listed in precache.assets",
                self.placeholder_image
            ));
        }
        Ok(())
    }
}
