//! # soundctl-adapter-notify
//!
//! Observer that turns every `StateChanged` broadcast into a freedesktop
//! desktop notification, the way the volume and output keys report back to
//! the user.
//!
//! Volume changes and output changes use two separate notification slots,
//! each replacing its previous popup instead of stacking new ones.
//!
//! ## Dependency rule
//!
//! Depends on `soundctl-domain` only; it consumes the broadcast channel
//! handed out by the in-process event bus.

pub mod config;
pub mod error;

pub use config::NotifyConfig;
pub use error::NotifyError;

use soundctl_domain::command::Command;
use soundctl_domain::event::StateChanged;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Label shown when every output is silenced.
const MUTE_SUMMARY: &str = "Mute";

/// Which popup a notification replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Volume,
    Outputs,
}

impl Slot {
    fn tag(self) -> &'static str {
        match self {
            Self::Volume => "soundctl-volume",
            Self::Outputs => "soundctl-outputs",
        }
    }
}

/// A rendered notification, ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub slot: Slot,
    pub summary: String,
    /// Gauge value, drawn as a progress bar by servers that support it.
    pub value: Option<u8>,
}

impl Notification {
    /// Describe a state change the way the volume keys report it.
    #[must_use]
    pub fn from_event(event: &StateChanged) -> Self {
        match event.command {
            Command::VolumeUp | Command::VolumeDown | Command::NotifyVolume => Self {
                slot: Slot::Volume,
                summary: format!("Volume {}%", event.state.volume_percent),
                value: Some(event.state.volume_percent),
            },
            Command::CycleOutputs | Command::Rescan | Command::NotifyOutputs
                if event.state.muted =>
            {
                Self {
                    slot: Slot::Outputs,
                    summary: MUTE_SUMMARY.to_string(),
                    value: None,
                }
            }
            Command::CycleOutputs | Command::Rescan | Command::NotifyOutputs => Self {
                slot: Slot::Outputs,
                summary: event.state.active_output.clone(),
                value: Some(event.state.volume_percent),
            },
        }
    }
}

/// Shows desktop notifications for state changes.
pub struct DesktopNotifier {
    config: NotifyConfig,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Spawn the notification loop on `receiver`.
    ///
    /// The task ends once every sender of the channel is gone.
    pub fn start(self, receiver: broadcast::Receiver<StateChanged>) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    async fn run(self, mut receiver: broadcast::Receiver<StateChanged>) {
        tracing::info!(command = %self.config.command.display(), "desktop notifier started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let notification = Notification::from_event(&event);
                    if let Err(err) = self.show(&notification).await {
                        tracing::warn!(error = %err, summary = %notification.summary, "failed to show notification");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notifier lagged behind, skipping events");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("desktop notifier stopped");
    }

    /// Run the notification command once.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Spawn`] when the command cannot be started and
    /// [`NotifyError::Command`] when it exits unsuccessfully.
    pub async fn show(&self, notification: &Notification) -> Result<(), NotifyError> {
        let output = tokio::process::Command::new(&self.config.command)
            .args(self.args(notification))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(NotifyError::Spawn)?;
        if !output.status.success() {
            return Err(NotifyError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    fn args(&self, notification: &Notification) -> Vec<String> {
        let mut args = vec![
            "--app-name".to_string(),
            self.config.app_name.clone(),
            "--icon".to_string(),
            self.config.icon.clone(),
            "--expire-time".to_string(),
            self.config.expire_after().as_millis().to_string(),
            "--hint".to_string(),
            format!(
                "string:x-canonical-private-synchronous:{}",
                notification.slot.tag()
            ),
        ];
        if let Some(value) = notification.value {
            args.push("--hint".to_string());
            args.push(format!("int:value:{value}"));
        }
        args.push(notification.summary.clone());
        args
    }
}
