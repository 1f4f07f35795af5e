//! Notifier error types.

/// Errors raised while showing a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification command could not be started.
    #[error("failed to run notification command")]
    Spawn(#[source] std::io::Error),

    /// The notification command exited with a failure status.
    #[error("notification command failed: {0}")]
    Command(String),
}
