//! Desktop notification configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the desktop notifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Whether state changes are shown as desktop notifications.
    pub enabled: bool,
    /// Path (or bare name) of the `notify-send` executable.
    pub command: PathBuf,
    /// Application name shown by the notification server.
    pub app_name: String,
    /// Icon name from the freedesktop icon theme.
    pub icon: String,
    /// How long a notification stays on screen, in milliseconds.
    pub timeout_ms: u32,
}

impl NotifyConfig {
    #[must_use]
    pub fn expire_after(&self) -> Duration {
        Duration::from_millis(u64::from(self.timeout_ms))
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: PathBuf::from("notify-send"),
            app_name: "soundctl".to_string(),
            icon: "volume-knob".to_string(),
            timeout_ms: 1000,
        }
    }
}
