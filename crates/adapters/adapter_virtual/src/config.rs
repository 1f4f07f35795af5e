//! Virtual mixer configuration.

use serde::Deserialize;
use soundctl_domain::id::OutputId;

/// One simulated output and its power-on volume.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualOutputConfig {
    pub name: OutputId,
    #[serde(default = "default_volume")]
    pub volume: u8,
}

fn default_volume() -> u8 {
    50
}

/// Configuration for the virtual mixer backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Simulated outputs, in rotation order.
    pub outputs: Vec<VirtualOutputConfig>,
    /// Artificial latency added to every mixer call.
    pub delay_ms: Option<u64>,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        let outputs = [("Speaker", 40), ("Headphone", 70)]
            .into_iter()
            .filter_map(|(name, volume)| {
                Some(VirtualOutputConfig {
                    name: OutputId::new(name).ok()?,
                    volume,
                })
            })
            .collect();
        Self {
            outputs,
            delay_ms: None,
        }
    }
}
