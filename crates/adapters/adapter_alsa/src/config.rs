//! ALSA mixer configuration.

use std::path::PathBuf;

use serde::Deserialize;
use soundctl_domain::id::OutputId;

/// Configuration for the ALSA mixer backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlsaConfig {
    /// Path (or bare name) of the `amixer` executable.
    pub amixer: PathBuf,
    /// Card number or name passed as `-c`.
    pub card: Option<String>,
    /// Mixer device passed as `-D`; takes precedence over `card`.
    pub device: Option<String>,
    /// Simple controls to rotate through, in rotation order. An empty list
    /// means every control the card exposes.
    pub outputs: Vec<OutputId>,
}

impl AlsaConfig {
    /// Control names shipped as defaults, in rotation order.
    pub const DEFAULT_OUTPUTS: [&'static str; 2] = ["Headphone", "Speaker"];
}

impl Default for AlsaConfig {
    fn default() -> Self {
        Self {
            amixer: PathBuf::from("amixer"),
            card: None,
            device: None,
            outputs: Self::DEFAULT_OUTPUTS
                .iter()
                .filter_map(|name| OutputId::new(*name).ok())
                .collect(),
        }
    }
}
