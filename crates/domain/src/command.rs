//! Commands — the requests a client can make of the daemon.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A request that may be followed by a `StateChanged` broadcast. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    VolumeUp,
    VolumeDown,
    CycleOutputs,
    /// Re-list the hardware; broadcast only when the selection moved.
    Rescan,
    /// Re-announce the current volume without changing anything.
    NotifyVolume,
    /// Re-announce the current output without changing anything.
    NotifyOutputs,
}

impl Command {
    /// Wire name, identical to the client subcommand.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::CycleOutputs => "cycle_outputs",
            Self::Rescan => "rescan",
            Self::NotifyVolume => "notify_volume",
            Self::NotifyOutputs => "notify_outputs",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
