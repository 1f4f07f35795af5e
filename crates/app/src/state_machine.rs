//! Volume/output state machine.
//!
//! Owns the [`DaemonState`] and the [`Mixer`] and applies commands to both.
//! Hardware is always touched *before* memory: a plan is computed, pushed to
//! the mixer, and only committed once every mixer call succeeded. A failed or
//! timed-out call therefore leaves the selection and volumes untouched.
//!
//! States form a ring `{Output₀, …, Outputₙ, Muted}`. `cycle_outputs` is the
//! only transition; volume commands are self-loops on the active output.

use std::future::Future;
use std::time::Duration;

use soundctl_domain::error::{ConfigurationError, HardwareError, SoundCtlError};
use soundctl_domain::event::StateSnapshot;
use soundctl_domain::output::Output;
use soundctl_domain::registry::{OutputRegistry, Selection};
use soundctl_domain::state::{DaemonState, SelectionPlan, VolumeChange};
use soundctl_domain::volume::Step;

use crate::ports::Mixer;

/// Tunables of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachineOptions {
    /// Default increment of `volume_up` / `volume_down`.
    pub step: Step,
    /// Upper bound on every single mixer call.
    pub hardware_timeout: Duration,
}

impl Default for StateMachineOptions {
    fn default() -> Self {
        Self {
            step: Step::DEFAULT,
            hardware_timeout: Duration::from_millis(300),
        }
    }
}

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Hardware and memory were updated; observers should be told.
    Changed(StateSnapshot),
    /// Nothing happened (e.g. a volume key while muted).
    Unchanged(StateSnapshot),
}

impl Outcome {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    #[must_use]
    pub fn into_snapshot(self) -> StateSnapshot {
        match self {
            Self::Changed(snapshot) | Self::Unchanged(snapshot) => snapshot,
        }
    }
}

/// The daemon's single owner of output/volume state.
pub struct StateMachine<M> {
    mixer: M,
    state: DaemonState,
    options: StateMachineOptions,
}

impl<M: Mixer> StateMachine<M> {
    /// Probe the mixer and enter the initial state.
    ///
    /// Lists the outputs, reads each one's volume, selects the first output
    /// and makes it the only audible one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoOutputs`] when the mixer reports no
    /// outputs, [`ConfigurationError::DuplicateOutput`] when it reports one
    /// twice, or [`SoundCtlError::HardwareUnavailable`] when probing fails.
    #[tracing::instrument(skip_all)]
    pub async fn bootstrap(mixer: M, options: StateMachineOptions) -> Result<Self, SoundCtlError> {
        let timeout = options.hardware_timeout;
        let ids = guarded(timeout, "list_outputs", mixer.list_outputs()).await?;
        if ids.is_empty() {
            return Err(ConfigurationError::NoOutputs.into());
        }

        let mut outputs = Vec::with_capacity(ids.len());
        for id in ids {
            let volume = guarded(timeout, "get_volume", mixer.get_volume(&id)).await?;
            tracing::debug!(output = %id, %volume, "output discovered");
            outputs.push(Output::new(id, volume));
        }

        let mut machine = Self {
            mixer,
            state: DaemonState::new(OutputRegistry::new(outputs)?),
            options,
        };
        let plan = machine.state.plan_selection(machine.state.selection());
        machine.apply_selection(&plan).await?;

        let snapshot = machine.snapshot();
        tracing::info!(
            outputs = machine.state.registry().len(),
            active = %snapshot.active_output,
            volume = snapshot.volume_percent,
            "state machine ready"
        );
        Ok(machine)
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.state.selection()
    }

    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        self.state.registry().outputs()
    }

    #[must_use]
    pub fn options(&self) -> StateMachineOptions {
        self.options
    }

    /// Raise the active output by `step`, clamped to 100. No-op while muted.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] if the mixer rejects
    /// the new volume; the stored volume is then unchanged.
    pub async fn volume_up(&mut self, step: Step) -> Result<Outcome, SoundCtlError> {
        self.adjust_volume(VolumeChange::Up(step)).await
    }

    /// Lower the active output by `step`, clamped to 0. No-op while muted.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] if the mixer rejects
    /// the new volume; the stored volume is then unchanged.
    pub async fn volume_down(&mut self, step: Step) -> Result<Outcome, SoundCtlError> {
        self.adjust_volume(VolumeChange::Down(step)).await
    }

    async fn adjust_volume(&mut self, change: VolumeChange) -> Result<Outcome, SoundCtlError> {
        let Some(plan) = self.state.plan_volume(change) else {
            tracing::debug!(?change, "volume command ignored while muted");
            return Ok(Outcome::Unchanged(self.snapshot()));
        };

        let result = guarded(
            self.options.hardware_timeout,
            "set_volume",
            self.mixer.set_volume(&plan.output, plan.volume),
        )
        .await;
        self.track(result)?;

        self.state.commit_volume(&plan);
        tracing::debug!(output = %plan.output, volume = %plan.volume, "volume applied");
        Ok(Outcome::Changed(self.snapshot()))
    }

    /// Advance to the next slot of the ring and make it the only audible one.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] if any mixer call fails;
    /// the selection then stays where it was.
    pub async fn cycle_outputs(&mut self) -> Result<Outcome, SoundCtlError> {
        let plan = self.state.plan_cycle();
        let result = self.apply_selection(&plan).await;
        if let Err(err) = self.track(result) {
            self.restore_selection().await;
            return Err(err);
        }

        self.state.commit_selection(&plan);
        tracing::debug!(selection = ?plan.target, "selection applied");
        Ok(Outcome::Changed(self.snapshot()))
    }

    /// Re-list the hardware outputs and reconcile the registry.
    ///
    /// Outputs that appeared or came back are silenced unless selected. When
    /// the selected output is gone, the selection moves to the first
    /// available output (or to mute). Memory is only updated once the
    /// hardware accepted the new selection.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] if listing, probing or
    /// silencing fails; the registry and selection then stay as they were.
    pub async fn rescan(&mut self) -> Result<Outcome, SoundCtlError> {
        let timeout = self.options.hardware_timeout;
        let ids = guarded(timeout, "list_outputs", self.mixer.list_outputs()).await?;

        let mut discovered = Vec::with_capacity(ids.len());
        for id in ids {
            let known = self
                .state
                .registry()
                .position(&id)
                .and_then(|index| self.state.registry().get(index))
                .map(|output| output.volume);
            let volume = match known {
                Some(volume) => volume,
                None => guarded(timeout, "get_volume", self.mixer.get_volume(&id)).await?,
            };
            discovered.push((id, volume));
        }

        let plan = self.state.plan_rescan(discovered);
        let result = self.apply_selection(&plan.selection).await;
        if let Err(err) = self.track(result) {
            self.restore_selection().await;
            return Err(err);
        }

        for id in &plan.changes.added {
            tracing::info!(output = %id, "new output discovered");
        }
        for id in &plan.changes.restored {
            tracing::info!(output = %id, "output is back");
        }
        for id in &plan.changes.removed {
            tracing::warn!(output = %id, "output no longer listed");
        }

        let before = self.snapshot();
        self.state.commit_rescan(plan);
        let after = self.snapshot();
        if before == after {
            Ok(Outcome::Unchanged(after))
        } else {
            tracing::debug!(selection = ?self.state.selection(), "selection moved by rescan");
            Ok(Outcome::Changed(after))
        }
    }

    /// Silence every other available output, then reapply the target's
    /// stored volume and unmute it.
    async fn apply_selection(&self, plan: &SelectionPlan) -> Result<(), SoundCtlError> {
        let timeout = self.options.hardware_timeout;
        for id in &plan.deactivate {
            guarded(timeout, "set_active", self.mixer.set_active(id, false)).await?;
        }
        if let Some((id, volume)) = &plan.activate {
            guarded(timeout, "set_volume", self.mixer.set_volume(id, *volume)).await?;
            guarded(timeout, "set_active", self.mixer.set_active(id, true)).await?;
        }
        Ok(())
    }

    /// Best-effort re-application of the current selection after a partially
    /// applied plan.
    async fn restore_selection(&self) {
        let plan = self.state.plan_selection(self.state.selection());
        if let Err(err) = self.apply_selection(&plan).await {
            tracing::warn!(error = %err, "could not restore previous selection");
        }
    }

    /// Remember outputs the hardware reported as gone so rotation skips them.
    fn track<T>(&mut self, result: Result<T, SoundCtlError>) -> Result<T, SoundCtlError> {
        if let Err(err) = &result {
            if let Some(id) = err.vanished_output() {
                if self.state.mark_unavailable(id) {
                    tracing::warn!(output = %id, "output vanished, skipping it from now on");
                }
            }
        }
        result
    }
}

/// Bound a mixer call by `timeout`, mapping expiry to [`HardwareError::Timeout`].
async fn guarded<T>(
    timeout: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T, SoundCtlError>>,
) -> Result<T, SoundCtlError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(HardwareError::Timeout {
            operation,
            after: timeout,
        }
        .into()),
    }
}
