//! A simulated output channel.

use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;

/// Hardware-side view of one virtual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualOutput {
    pub id: OutputId,
    pub volume: Volume,
    pub active: bool,
}

impl VirtualOutput {
    /// A muted output at `volume`, as a freshly plugged sink would be.
    #[must_use]
    pub fn new(id: OutputId, volume: Volume) -> Self {
        Self {
            id,
            volume,
            active: false,
        }
    }
}
