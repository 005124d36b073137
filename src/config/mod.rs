// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod logging;
mod network;
mod notification;
mod origins;
mod precache;
mod settings;
mod store;
mod worker;

pub use logging::{LogFormat, LoggingConfig};
pub use network::NetworkConfig;
pub use notification::NotificationConfig;
pub use origins::OriginsConfig;
pub use precache::PrecacheConfig;
pub use settings::Settings;
pub use store::StoreConfig;
pub use worker::WorkerConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub precache: PrecacheConfig,
    #[serde(default)]
    pub origins: OriginsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub cache: StoreConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // Every referenced variable must be set before anything is substituted
        let mut missing = Vec::new();
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() && !missing.iter().any(|m| m == var_name) {
                missing.push(var_name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                missing.join("', '")
            ));
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.worker.validate()?;
        self.precache.validate()?;
        self.origins.validate()?;
        self.network.validate()?;
        self.cache.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err("logging.level cannot be empty".to_string());
        }

        // Every manifest entry must resolve against the scope
        Settings::from_config(self).map(|_| ())
    }
}
