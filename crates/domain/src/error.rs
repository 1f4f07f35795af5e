//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SoundCtlError`] via `#[from]` at the port boundary.

use std::time::Duration;

use crate::id::OutputId;

/// Top-level error for every daemon operation.
#[derive(Debug, thiserror::Error)]
pub enum SoundCtlError {
    /// The daemon cannot run with the discovered/configured setup.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A mixer call failed, timed out, or targeted a vanished output.
    #[error("hardware unavailable: {0}")]
    HardwareUnavailable(#[from] HardwareError),

    /// A value supplied by a caller violated a domain invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SoundCtlError {
    /// Stable machine-readable name of the failure kind.
    ///
    /// Used on the wire so that clients can distinguish failures without
    /// parsing messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::HardwareUnavailable(_) => "hardware_unavailable",
            Self::Validation(_) => "validation_error",
        }
    }

    /// The output the hardware reported as gone, if that is what happened.
    #[must_use]
    pub fn vanished_output(&self) -> Option<&OutputId> {
        match self {
            Self::HardwareUnavailable(HardwareError::OutputNotFound { output }) => Some(output),
            _ => None,
        }
    }
}

/// Startup-time setup problems. Fatal: the daemon refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no audio outputs were discovered")]
    NoOutputs,

    #[error("output {id} is listed more than once")]
    DuplicateOutput { id: OutputId },
}

/// Failures of the mixer hardware layer.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("output {output} no longer exists")]
    OutputNotFound { output: OutputId },

    #[error("mixer call {operation} timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("mixer device error")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations on caller-supplied values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("output identifier must not be empty")]
    EmptyOutputId,

    #[error("output identifier {0:?} is reserved")]
    ReservedOutputId(String),

    #[error("volume step {0} is outside 1..=100")]
    StepOutOfRange(u16),

    #[error("malformed request: {0}")]
    Malformed(String),
}
