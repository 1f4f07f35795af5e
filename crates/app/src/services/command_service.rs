//! Command service — the single entry point for every client request.
//!
//! Requests arriving concurrently are serialized through one async mutex so
//! the state machine only ever sees one command at a time. Each command that
//! changed the state is followed by exactly one [`StateChanged`] event,
//! published after the lock is released.

use soundctl_domain::command::Command;
use soundctl_domain::error::SoundCtlError;
use soundctl_domain::event::{StateChanged, StateSnapshot};
use soundctl_domain::output::Output;
use soundctl_domain::volume::Step;
use tokio::sync::Mutex;

use crate::ports::{EventPublisher, Mixer};
use crate::state_machine::{Outcome, StateMachine};

/// Serialized front door of the [`StateMachine`].
pub struct CommandService<M, P> {
    machine: Mutex<StateMachine<M>>,
    publisher: P,
    step: Step,
}

impl<M: Mixer, P: EventPublisher> CommandService<M, P> {
    /// Wrap a bootstrapped state machine; its configured step becomes the
    /// default increment of the volume commands.
    pub fn new(machine: StateMachine<M>, publisher: P) -> Self {
        let step = machine.options().step;
        Self {
            machine: Mutex::new(machine),
            publisher,
            step,
        }
    }

    /// Raise the active output by the configured step.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    pub async fn volume_up(&self) -> Result<StateSnapshot, SoundCtlError> {
        self.volume_up_by(self.step).await
    }

    /// Lower the active output by the configured step.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    pub async fn volume_down(&self) -> Result<StateSnapshot, SoundCtlError> {
        self.volume_down_by(self.step).await
    }

    /// Raise the active output by an explicit amount.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    #[tracing::instrument(skip(self), fields(step = step.amount()))]
    pub async fn volume_up_by(&self, step: Step) -> Result<StateSnapshot, SoundCtlError> {
        let outcome = self.machine.lock().await.volume_up(step).await;
        self.finish(Command::VolumeUp, outcome).await
    }

    /// Lower the active output by an explicit amount.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    #[tracing::instrument(skip(self), fields(step = step.amount()))]
    pub async fn volume_down_by(&self, step: Step) -> Result<StateSnapshot, SoundCtlError> {
        let outcome = self.machine.lock().await.volume_down(step).await;
        self.finish(Command::VolumeDown, outcome).await
    }

    /// Move to the next output of the ring (or to mute).
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    #[tracing::instrument(skip(self))]
    pub async fn cycle_outputs(&self) -> Result<StateSnapshot, SoundCtlError> {
        let outcome = self.machine.lock().await.cycle_outputs().await;
        self.finish(Command::CycleOutputs, outcome).await
    }

    /// Broadcast the current volume again, e.g. to show it on screen.
    #[tracing::instrument(skip(self))]
    pub async fn notify_volume(&self) -> StateSnapshot {
        self.announce(Command::NotifyVolume).await
    }

    /// Broadcast the current output again, e.g. to show it on screen.
    #[tracing::instrument(skip(self))]
    pub async fn notify_outputs(&self) -> StateSnapshot {
        self.announce(Command::NotifyOutputs).await
    }

    /// Dispatch a command with the default step.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    pub async fn execute(&self, command: Command) -> Result<StateSnapshot, SoundCtlError> {
        match command {
            Command::VolumeUp => self.volume_up().await,
            Command::VolumeDown => self.volume_down().await,
            Command::CycleOutputs => self.cycle_outputs().await,
            Command::Rescan => {
                self.rescan().await?;
                Ok(self.current_state().await)
            }
            Command::NotifyVolume => Ok(self.notify_volume().await),
            Command::NotifyOutputs => Ok(self.notify_outputs().await),
        }
    }

    /// Read-only view of the current state.
    pub async fn current_state(&self) -> StateSnapshot {
        self.machine.lock().await.snapshot()
    }

    /// Every output of the ring in rotation order.
    pub async fn outputs(&self) -> Vec<Output> {
        self.machine.lock().await.outputs().to_vec()
    }

    /// Re-list the hardware outputs.
    ///
    /// A `StateChanged` event follows when the active output disappeared and
    /// the selection moved.
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::HardwareUnavailable`] when the mixer fails.
    #[tracing::instrument(skip(self))]
    pub async fn rescan(&self) -> Result<Vec<Output>, SoundCtlError> {
        let (outcome, outputs) = {
            let mut machine = self.machine.lock().await;
            let outcome = machine.rescan().await;
            (outcome, machine.outputs().to_vec())
        };
        self.finish(Command::Rescan, outcome).await?;
        Ok(outputs)
    }

    async fn announce(&self, command: Command) -> StateSnapshot {
        let snapshot = self.current_state().await;
        let event = StateChanged::new(snapshot.clone(), command);
        if let Err(err) = self.publisher.publish(event).await {
            tracing::error!(error = %err, %command, "failed to publish state");
        }
        snapshot
    }

    async fn finish(
        &self,
        command: Command,
        outcome: Result<Outcome, SoundCtlError>,
    ) -> Result<StateSnapshot, SoundCtlError> {
        match outcome {
            Ok(Outcome::Changed(snapshot)) => {
                let event = StateChanged::new(snapshot.clone(), command);
                if let Err(err) = self.publisher.publish(event).await {
                    tracing::error!(error = %err, %command, "failed to publish state change");
                }
                Ok(snapshot)
            }
            Ok(Outcome::Unchanged(snapshot)) => Ok(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, %command, "command failed");
                Err(err)
            }
        }
    }
}
