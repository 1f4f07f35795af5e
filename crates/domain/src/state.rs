//! Daemon state — the output ring plus the current selection.
//!
//! Transitions are split in two halves so the application layer can touch
//! hardware in between: `plan_*` computes what must happen without mutating
//! anything, `commit_*` records it once the hardware accepted it. A plan that
//! is never committed leaves the state exactly as it was.

use crate::event::StateSnapshot;
use crate::id::OutputId;
use crate::output::Output;
use crate::registry::{OutputRegistry, Reconciliation, Selection};
use crate::volume::{Step, Volume};

/// Direction and size of a volume adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Up(Step),
    Down(Step),
}

impl VolumeChange {
    #[must_use]
    pub fn apply(self, volume: Volume) -> Volume {
        match self {
            Self::Up(step) => volume.raise(step),
            Self::Down(step) => volume.lower(step),
        }
    }
}

/// New volume for the active output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumePlan {
    pub index: usize,
    pub output: OutputId,
    pub volume: Volume,
}

/// Hardware changes needed to move the selection to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    pub target: Selection,
    /// Every other available output, silenced first.
    pub deactivate: Vec<OutputId>,
    /// The output to make audible and the stored volume to reapply.
    pub activate: Option<(OutputId, Volume)>,
}

/// A hardware listing applied to a copy of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescanPlan {
    /// State adopted once the hardware matches `selection`.
    pub state: DaemonState,
    /// Silences every available output but the selected one.
    pub selection: SelectionPlan,
    pub changes: Reconciliation,
}

/// Authoritative in-memory state of the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonState {
    registry: OutputRegistry,
    selection: Selection,
}

impl DaemonState {
    /// Start at the registry's first available output.
    #[must_use]
    pub fn new(registry: OutputRegistry) -> Self {
        let selection = registry.first();
        Self {
            registry,
            selection,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &OutputRegistry {
        &self.registry
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected output, or `None` while muted.
    #[must_use]
    pub fn active_output(&self) -> Option<&Output> {
        match self.selection {
            Selection::Output(index) => self.registry.get(index),
            Selection::Muted => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        match self.active_output() {
            Some(output) => StateSnapshot {
                active_output: output.id.to_string(),
                volume_percent: output.volume.percent(),
                muted: false,
            },
            None => StateSnapshot::muted(),
        }
    }

    /// Compute the new volume of the active output.
    ///
    /// Returns `None` while muted: volume commands only act on a real output.
    #[must_use]
    pub fn plan_volume(&self, change: VolumeChange) -> Option<VolumePlan> {
        let Selection::Output(index) = self.selection else {
            return None;
        };
        let output = self.registry.get(index)?;
        Some(VolumePlan {
            index,
            output: output.id.clone(),
            volume: change.apply(output.volume),
        })
    }

    pub fn commit_volume(&mut self, plan: &VolumePlan) {
        if let Some(output) = self.registry.get_mut(plan.index) {
            if output.id == plan.output {
                output.volume = plan.volume;
            }
        }
    }

    /// Plan the move to the next slot of the ring.
    #[must_use]
    pub fn plan_cycle(&self) -> SelectionPlan {
        self.plan_selection(self.registry.next(self.selection))
    }

    /// Plan the hardware changes that make `target` the only audible choice.
    #[must_use]
    pub fn plan_selection(&self, target: Selection) -> SelectionPlan {
        let target_index = match target {
            Selection::Output(index) => Some(index),
            Selection::Muted => None,
        };

        let deactivate = self
            .registry
            .outputs()
            .iter()
            .enumerate()
            .filter(|(index, output)| output.available && Some(*index) != target_index)
            .map(|(_, output)| output.id.clone())
            .collect();

        let activate = target_index
            .and_then(|index| self.registry.get(index))
            .map(|output| (output.id.clone(), output.volume));

        SelectionPlan {
            target,
            deactivate,
            activate,
        }
    }

    pub fn commit_selection(&mut self, plan: &SelectionPlan) {
        self.selection = plan.target;
    }

    /// Forget about an output the hardware no longer reports.
    pub fn mark_unavailable(&mut self, id: &OutputId) -> bool {
        self.registry.mark_unavailable(id)
    }

    /// Plan the adoption of a fresh hardware listing.
    ///
    /// See [`OutputRegistry::reconcile`]. A selected output that is no longer
    /// listed hands the selection to the first available output, or to
    /// `Muted` when none is left. The returned selection plan re-asserts
    /// exclusivity over every available output, so outputs that came back
    /// or appeared are silenced too.
    #[must_use]
    pub fn plan_rescan(&self, discovered: Vec<(OutputId, Volume)>) -> RescanPlan {
        let mut state = self.clone();
        let changes = state.registry.reconcile(discovered);
        if state.active_output().is_none_or(|output| !output.available) {
            state.selection = match state.selection {
                Selection::Output(_) => state.registry.first(),
                Selection::Muted => Selection::Muted,
            };
        }
        let selection = state.plan_selection(state.selection);
        RescanPlan {
            state,
            selection,
            changes,
        }
    }

    pub fn commit_rescan(&mut self, plan: RescanPlan) {
        *self = plan.state;
    }
}
