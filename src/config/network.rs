//! Network fetcher configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_USER_AGENT;

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds. Unset means a hung fetch hangs its strategy.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == Some(0) {
            return Err("network.timeout_seconds must be > 0 when set".to_string());
        }
        Ok(())
    }
}
