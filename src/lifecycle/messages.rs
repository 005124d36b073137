//! Control messages posted to the worker by its pages.

use serde::{Deserialize, Serialize};

/// `{"type": "SKIP_WAITING"}` or `{"type": "CLEAR_CACHE"}`. Extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Activate a waiting install without waiting for clients to close
    SkipWaiting,
    /// Delete every cache generation
    ClearCache,
}

impl ControlMessage {
    /// Parse a posted message. Anything unrecognised yields `None`.
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(message = %value, error = %e, "Ignoring unrecognised message");
                None
            }
        }
    }
}
