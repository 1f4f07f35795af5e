//! # soundctl-adapter-virtual
//!
//! Simulated sound card implementing the [`Mixer`] port entirely in memory.
//! Used by `soundctld` when `mixer.backend = "virtual"` and by tests across
//! the workspace.
//!
//! Besides the port operations it exposes a few knobs that a real card does
//! not have: outputs can be unplugged or plugged at runtime and every call
//! can be slowed down.
//!
//! ## Dependency rule
//!
//! Depends on `soundctl-app` (port traits) and `soundctl-domain` only.

pub mod config;
mod output;

pub use config::VirtualConfig;
pub use output::VirtualOutput;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use soundctl_app::ports::Mixer;
use soundctl_domain::error::{HardwareError, SoundCtlError};
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;

#[derive(Default)]
struct Card {
    outputs: Vec<VirtualOutput>,
    delay: Option<Duration>,
}

impl Card {
    fn find_mut(&mut self, id: &OutputId) -> Result<&mut VirtualOutput, SoundCtlError> {
        self.outputs
            .iter_mut()
            .find(|output| &output.id == id)
            .ok_or_else(|| HardwareError::OutputNotFound { output: id.clone() }.into())
    }
}

/// In-memory mixer.
#[derive(Default)]
pub struct VirtualMixer {
    card: Mutex<Card>,
}

impl VirtualMixer {
    /// Create a card with the given outputs, all muted.
    #[must_use]
    pub fn new(outputs: impl IntoIterator<Item = (OutputId, Volume)>) -> Self {
        let outputs = outputs
            .into_iter()
            .map(|(id, volume)| VirtualOutput::new(id, volume))
            .collect();
        Self {
            card: Mutex::new(Card {
                outputs,
                delay: None,
            }),
        }
    }

    /// Create a card from its configuration, applying the configured delay.
    #[must_use]
    pub fn from_config(config: &VirtualConfig) -> Self {
        let mixer = Self::new(
            config
                .outputs
                .iter()
                .map(|output| (output.name.clone(), Volume::new(output.volume))),
        );
        mixer.set_delay(config.delay_ms.map(Duration::from_millis));
        mixer
    }

    /// Slow every subsequent call down by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.card().delay = delay;
    }

    /// Plug a new output in at the end of the card.
    pub fn plug(&self, id: OutputId, volume: Volume) {
        tracing::debug!(output = %id, "virtual output plugged");
        self.card().outputs.push(VirtualOutput::new(id, volume));
    }

    /// Remove an output; later calls targeting it fail with `OutputNotFound`.
    pub fn unplug(&self, id: &OutputId) -> bool {
        let mut card = self.card();
        let before = card.outputs.len();
        card.outputs.retain(|output| &output.id != id);
        let removed = card.outputs.len() != before;
        if removed {
            tracing::debug!(output = %id, "virtual output unplugged");
        }
        removed
    }

    /// Current hardware view of every output.
    #[must_use]
    pub fn outputs(&self) -> Vec<VirtualOutput> {
        self.card().outputs.clone()
    }

    #[must_use]
    pub fn output(&self, id: &str) -> Option<VirtualOutput> {
        self.card()
            .outputs
            .iter()
            .find(|output| output.id.as_str() == id)
            .cloned()
    }

    // A poisoned lock only means a panic elsewhere; the card data is still usable.
    fn card(&self) -> MutexGuard<'_, Card> {
        self.card.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn settle(&self) {
        let delay = self.card().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Mixer for VirtualMixer {
    async fn list_outputs(&self) -> Result<Vec<OutputId>, SoundCtlError> {
        self.settle().await;
        Ok(self
            .card()
            .outputs
            .iter()
            .map(|output| output.id.clone())
            .collect())
    }

    async fn get_volume(&self, output: &OutputId) -> Result<Volume, SoundCtlError> {
        self.settle().await;
        let mut card = self.card();
        Ok(card.find_mut(output)?.volume)
    }

    async fn set_volume(&self, output: &OutputId, volume: Volume) -> Result<(), SoundCtlError> {
        self.settle().await;
        let mut card = self.card();
        card.find_mut(output)?.volume = volume;
        tracing::trace!(%output, %volume, "virtual volume set");
        Ok(())
    }

    async fn set_active(&self, output: &OutputId, active: bool) -> Result<(), SoundCtlError> {
        self.settle().await;
        let mut card = self.card();
        card.find_mut(output)?.active = active;
        tracing::trace!(%output, active, "virtual output switched");
        Ok(())
    }
}
