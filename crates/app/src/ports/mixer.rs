//! Mixer port — the hardware sound-control capability.
//!
//! Adapters translate these abstract operations into device calls (ALSA
//! simple controls, an in-memory simulation, …) and report every failure as
//! [`SoundCtlError::HardwareUnavailable`]. A call targeting an output the
//! device no longer has must fail with
//! [`HardwareError::OutputNotFound`](soundctl_domain::error::HardwareError::OutputNotFound).

use std::future::Future;

use soundctl_domain::error::SoundCtlError;
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;

/// Volume and mute control over a set of audio outputs.
pub trait Mixer {
    /// Outputs currently present, in a stable discovery order.
    fn list_outputs(&self) -> impl Future<Output = Result<Vec<OutputId>, SoundCtlError>> + Send;

    /// Current hardware volume of `output`.
    fn get_volume(
        &self,
        output: &OutputId,
    ) -> impl Future<Output = Result<Volume, SoundCtlError>> + Send;

    /// Set the hardware volume of `output`.
    fn set_volume(
        &self,
        output: &OutputId,
        volume: Volume,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send;

    /// Unmute (`true`) or mute (`false`) `output`.
    fn set_active(
        &self,
        output: &OutputId,
        active: bool,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send;
}

impl<T: Mixer + Send + Sync> Mixer for std::sync::Arc<T> {
    fn list_outputs(&self) -> impl Future<Output = Result<Vec<OutputId>, SoundCtlError>> + Send {
        (**self).list_outputs()
    }

    fn get_volume(
        &self,
        output: &OutputId,
    ) -> impl Future<Output = Result<Volume, SoundCtlError>> + Send {
        (**self).get_volume(output)
    }

    fn set_volume(
        &self,
        output: &OutputId,
        volume: Volume,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send {
        (**self).set_volume(output, volume)
    }

    fn set_active(
        &self,
        output: &OutputId,
        active: bool,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send {
        (**self).set_active(output, active)
    }
}
