//! Push notification surface.
//!
//! A push carries an optional JSON payload `{"title": ..., "body": ...}`.
//! Missing fields fall back to the configured defaults; icon, badge and
//! vibration pattern always come from configuration.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Invalid push payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// A notification ready to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Url,
    pub badge: Url,
    pub vibrate: Vec<u32>,
}

/// Build the notification for a push event.
///
/// Returns `Ok(None)` when the push carried no data.
pub fn from_push(
    data: Option<&[u8]>,
    settings: &Settings,
) -> Result<Option<Notification>, NotificationError> {
    let Some(data) = data else {
        return Ok(None);
    };

    let payload: PushPayload = serde_json::from_slice(data)
        .map_err(|e| NotificationError::InvalidPayload(e.to_string()))?;

    Ok(Some(Notification {
        title: payload
            .title
            .unwrap_or_else(|| settings.notification_title.clone()),
        body: payload
            .body
            .unwrap_or_else(|| settings.notification_body.clone()),
        icon: settings.notification_icon.clone(),
        badge: settings.notification_icon.clone(),
        vibrate: settings.notification_vibrate.clone(),
    }))
}
