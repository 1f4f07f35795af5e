//! In-memory port implementations shared by the unit tests of this crate.

use std::sync::Mutex;
use std::time::Duration;

use soundctl_domain::error::{HardwareError, SoundCtlError};
use soundctl_domain::event::StateChanged;
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;

use crate::ports::{EventPublisher, Mixer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetVolume(OutputId, Volume),
    SetActive(OutputId, bool),
}

struct FakeOutput {
    id: OutputId,
    volume: Volume,
    active: bool,
}

#[derive(Default)]
struct Inner {
    outputs: Vec<FakeOutput>,
    calls: Vec<Call>,
    fail: bool,
    fail_writes: bool,
    delay: Option<Duration>,
    write_delay: Option<Duration>,
}

#[derive(Default)]
pub struct FakeMixer {
    inner: Mutex<Inner>,
}

impl FakeMixer {
    pub fn with_outputs(outputs: &[(&str, u8)]) -> Self {
        let mixer = Self::default();
        for (name, volume) in outputs {
            mixer.add_output(name, *volume, false);
        }
        mixer
    }

    pub fn add_output(&self, name: &str, volume: u8, active: bool) {
        self.inner.lock().unwrap().outputs.push(FakeOutput {
            id: OutputId::new(name).unwrap(),
            volume: Volume::new(volume),
            active,
        });
    }

    pub fn remove_output(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .outputs
            .retain(|output| output.id.as_str() != name);
    }

    pub fn set_hardware_active(&self, name: &str, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(output) = inner.outputs.iter_mut().find(|o| o.id.as_str() == name) {
            output.active = active;
        }
    }

    pub fn fail_device_calls(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }

    /// Fail `set_volume` and `set_active` while listing keeps working.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    /// Slow down `set_volume` and `set_active` only.
    pub fn set_write_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().write_delay = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn volume(&self, name: &str) -> u8 {
        let inner = self.inner.lock().unwrap();
        inner
            .outputs
            .iter()
            .find(|o| o.id.as_str() == name)
            .map(|o| o.volume.percent())
            .unwrap()
    }

    pub fn is_active(&self, name: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .outputs
            .iter()
            .any(|o| o.id.as_str() == name && o.active)
    }

    pub fn active_outputs(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .outputs
            .iter()
            .filter(|o| o.active)
            .map(|o| o.id.to_string())
            .collect()
    }

    async fn pause(&self) {
        let delay = self.inner.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn pause_write(&self) {
        let delay = {
            let inner = self.inner.lock().unwrap();
            inner.write_delay.or(inner.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn update(
        &self,
        id: &OutputId,
        call: Call,
        apply: impl FnOnce(&mut FakeOutput),
    ) -> Result<(), SoundCtlError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail || inner.fail_writes {
            return Err(HardwareError::Device("simulated failure".into()).into());
        }
        inner.calls.push(call);
        let output = inner
            .outputs
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| HardwareError::OutputNotFound { output: id.clone() })?;
        apply(output);
        Ok(())
    }
}

impl Mixer for FakeMixer {
    async fn list_outputs(&self) -> Result<Vec<OutputId>, SoundCtlError> {
        self.pause().await;
        let inner = self.inner.lock().unwrap();
        if inner.fail {
            return Err(HardwareError::Device("simulated failure".into()).into());
        }
        Ok(inner.outputs.iter().map(|o| o.id.clone()).collect())
    }

    async fn get_volume(&self, output: &OutputId) -> Result<Volume, SoundCtlError> {
        self.pause().await;
        let inner = self.inner.lock().unwrap();
        inner
            .outputs
            .iter()
            .find(|o| &o.id == output)
            .map(|o| o.volume)
            .ok_or_else(|| {
                HardwareError::OutputNotFound {
                    output: output.clone(),
                }
                .into()
            })
    }

    async fn set_volume(&self, output: &OutputId, volume: Volume) -> Result<(), SoundCtlError> {
        self.pause_write().await;
        self.update(output, Call::SetVolume(output.clone(), volume), |o| {
            o.volume = volume;
        })
    }

    async fn set_active(&self, output: &OutputId, active: bool) -> Result<(), SoundCtlError> {
        self.pause_write().await;
        self.update(output, Call::SetActive(output.clone(), active), |o| {
            o.active = active;
        })
    }
}

/// Publisher that keeps every event it was handed.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<StateChanged>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<StateChanged> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: StateChanged) -> Result<(), SoundCtlError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
