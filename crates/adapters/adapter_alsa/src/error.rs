//! ALSA adapter error types.

use soundctl_domain::error::{HardwareError, SoundCtlError};
use soundctl_domain::id::OutputId;

/// Errors specific to the ALSA adapter.
#[derive(Debug, thiserror::Error)]
pub enum AlsaError {
    /// `amixer` could not be started.
    #[error("failed to run amixer")]
    Spawn(#[source] std::io::Error),

    /// `amixer` ran but exited with a failure status.
    #[error("amixer {args} failed: {stderr}")]
    Command { args: String, stderr: String },

    /// The card has no simple control with this name.
    #[error("no simple control named {0}")]
    UnknownControl(OutputId),

    /// `amixer` output did not contain what we expected.
    #[error("unexpected amixer output for {control}: {reason}")]
    Parse {
        control: String,
        reason: &'static str,
    },
}

impl AlsaError {
    /// Convert into a [`SoundCtlError::HardwareUnavailable`] for propagation
    /// across port boundaries.
    pub fn into_domain(self) -> SoundCtlError {
        match self {
            Self::UnknownControl(output) => HardwareError::OutputNotFound { output }.into(),
            other => HardwareError::Device(Box::new(other)).into(),
        }
    }
}

impl From<AlsaError> for SoundCtlError {
    fn from(err: AlsaError) -> Self {
        err.into_domain()
    }
}
