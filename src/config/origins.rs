//! Origin configuration: trusted cross-origin prefixes and the live-data host.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LIVE_DATA_HOST, DEFAULT_TRUSTED_ORIGINS};

fn default_trusted() -> Vec<String> {
    DEFAULT_TRUSTED_ORIGINS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_live_data_host() -> Option<String> {
    Some(DEFAULT_LIVE_DATA_HOST.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginsConfig {
    /// Origin prefixes whose traffic is cached alongside same-origin traffic
    #[serde(default = "default_trusted")]
    pub trusted: Vec<String>,
    /// Hostname always served network-only; `null` disables the bypass
    #[serde(default = "default_live_data_host")]
    pub live_data_host: Option<String>,
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self {
            trusted: default_trusted(),
            live_data_host: default_live_data_host(),
        }
    }
}

impl OriginsConfig {
    pub fn validate(&self) -> Result<(), String> {
        for origin in &self.trusted {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(format!(
                    "origins.trusted entry '{}' must start with http:// or https://",
                    origin
                ));
            }
        }
        if let Some(host) = &self.live_data_host {
            if host.trim().is_empty() {
                return Err("origins.live_data_host cannot be empty".to_string());
            }
            if host.contains("://") || host.contains('/') {
                return Err(format!(
                    "origins.live_data_host '{}' must be a bare hostname",
                    host
                ));
            }
        }
        Ok(())
    }
}
