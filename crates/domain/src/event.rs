//! State snapshots and the `StateChanged` event broadcast after each command.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::id::MUTED_LABEL;
use crate::time::{Timestamp, now};

/// What a client sees: which output is audible and how loud.
///
/// When everything is muted, `active_output` is `"muted"` and
/// `volume_percent` is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub active_output: String,
    pub volume_percent: u8,
    pub muted: bool,
}

impl StateSnapshot {
    #[must_use]
    pub fn muted() -> Self {
        Self {
            active_output: MUTED_LABEL.to_string(),
            volume_percent: 0,
            muted: true,
        }
    }
}

/// Broadcast after a command changed the daemon state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChanged {
    #[serde(flatten)]
    pub state: StateSnapshot,
    pub command: Command,
    pub timestamp: Timestamp,
}

impl StateChanged {
    /// Stamp a snapshot with the command that produced it and the current time.
    #[must_use]
    pub fn new(state: StateSnapshot, command: Command) -> Self {
        Self {
            state,
            command,
            timestamp: now(),
        }
    }
}
