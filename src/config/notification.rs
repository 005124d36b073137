//! Push notification presentation defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_NOTIFICATION_BODY, DEFAULT_NOTIFICATION_CLICK_URL, DEFAULT_NOTIFICATION_ICON,
    DEFAULT_NOTIFICATION_TITLE, DEFAULT_VIBRATION_PATTERN,
};

fn default_title() -> String {
    DEFAULT_NOTIFICATION_TITLE.to_string()
}

fn default_body() -> String {
    DEFAULT_NOTIFICATION_BODY.to_string()
}

fn default_icon() -> String {
    DEFAULT_NOTIFICATION_ICON.to_string()
}

fn default_vibrate() -> Vec<u32> {
    DEFAULT_VIBRATION_PATTERN.to_vec()
}

fn default_click_url() -> String {
    DEFAULT_NOTIFICATION_CLICK_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_body")]
    pub default_body: String,
    /// Icon and badge path, relative to the scope
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_vibrate")]
    pub vibrate: Vec<u32>,
    /// Page opened on click, relative to the scope
    #[serde(default = "default_click_url")]
    pub click_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            default_body: default_body(),
            icon: default_icon(),
            vibrate: default_vibrate(),
            click_url: default_click_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let config: NotificationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.default_title, "Utilisasi Warehouse");
        assert_eq!(config.default_body, "Notifikasi baru");
        assert_eq!(config.vibrate, vec![200, 100, 200]);
        assert_eq!(config.click_url, "./");
    }
}
