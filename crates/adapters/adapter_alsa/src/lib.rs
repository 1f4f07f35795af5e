//! # soundctl-adapter-alsa
//!
//! [`Mixer`] implementation over ALSA simple mixer controls.
//!
//! Every configured output is one simple control (`Speaker`, `Headphone`,
//! …). Volumes are the mean of the control's playback channels, and an
//! output is "active" when its playback switch is on. All device access goes
//! through the `amixer` tool so the daemon needs no native ALSA bindings.
//!
//! ## Dependency rule
//!
//! Depends on `soundctl-app` (port traits) and `soundctl-domain` only.

mod amixer;
pub mod config;
pub mod error;

pub use config::AlsaConfig;
pub use error::AlsaError;

use soundctl_app::ports::Mixer;
use soundctl_domain::error::SoundCtlError;
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;

use amixer::Amixer;

/// Mixer backed by one ALSA card.
pub struct AlsaMixer {
    amixer: Amixer,
    outputs: Vec<OutputId>,
}

impl AlsaMixer {
    #[must_use]
    pub fn new(config: &AlsaConfig) -> Self {
        Self {
            amixer: Amixer::from_config(config),
            outputs: config.outputs.clone(),
        }
    }

    /// Keep the configured outputs the card actually has, in configured
    /// order; with no configured outputs, keep every control.
    fn select(&self, controls: Vec<String>) -> Vec<OutputId> {
        if self.outputs.is_empty() {
            return controls
                .into_iter()
                .filter_map(|name| OutputId::new(name).ok())
                .collect();
        }
        self.outputs
            .iter()
            .filter(|output| {
                let present = controls.iter().any(|name| name == output.as_str());
                if !present {
                    tracing::debug!(%output, "configured output not found on card");
                }
                present
            })
            .cloned()
            .collect()
    }
}

impl Mixer for AlsaMixer {
    async fn list_outputs(&self) -> Result<Vec<OutputId>, SoundCtlError> {
        let controls = self.amixer.scontrols().await?;
        Ok(self.select(controls))
    }

    async fn get_volume(&self, output: &OutputId) -> Result<Volume, SoundCtlError> {
        self.amixer
            .get_volume(output)
            .await
            .map_err(AlsaError::into_domain)
    }

    async fn set_volume(&self, output: &OutputId, volume: Volume) -> Result<(), SoundCtlError> {
        self.amixer
            .set_volume(output, volume)
            .await
            .map_err(AlsaError::into_domain)
    }

    async fn set_active(&self, output: &OutputId, active: bool) -> Result<(), SoundCtlError> {
        self.amixer
            .set_switch(output, active)
            .await
            .map_err(AlsaError::into_domain)
    }
}
