//! Output registry — the fixed rotation order of outputs plus the Mute slot.
//!
//! The registry and [`Selection`] together form a ring:
//!
//! ```text
//! Output(0) -> Output(1) -> … -> Output(n-1) -> Muted -> Output(0)
//! ```
//!
//! Outputs the hardware stopped reporting keep their position but are
//! skipped while they are unavailable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, SoundCtlError};
use crate::id::OutputId;
use crate::output::Output;
use crate::volume::Volume;

/// The single active choice: one output, or the Mute sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Index into [`OutputRegistry::outputs`].
    Output(usize),
    Muted,
}

impl Selection {
    #[must_use]
    pub fn is_muted(self) -> bool {
        matches!(self, Self::Muted)
    }
}

/// Ordered, duplicate-free set of outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRegistry {
    outputs: Vec<Output>,
}

impl OutputRegistry {
    /// Build a registry in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoOutputs`] when `outputs` is empty and
    /// [`ConfigurationError::DuplicateOutput`] when an id appears twice.
    pub fn new(outputs: Vec<Output>) -> Result<Self, SoundCtlError> {
        if outputs.is_empty() {
            return Err(ConfigurationError::NoOutputs.into());
        }
        let mut seen = HashSet::with_capacity(outputs.len());
        for output in &outputs {
            if !seen.insert(&output.id) {
                return Err(ConfigurationError::DuplicateOutput {
                    id: output.id.clone(),
                }
                .into());
            }
        }
        Ok(Self { outputs })
    }

    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Always `false`: an empty registry cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Output> {
        self.outputs.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Output> {
        self.outputs.get_mut(index)
    }

    #[must_use]
    pub fn position(&self, id: &OutputId) -> Option<usize> {
        self.outputs.iter().position(|output| &output.id == id)
    }

    /// The output a freshly started daemon selects.
    #[must_use]
    pub fn first(&self) -> Selection {
        self.first_available_from(0)
    }

    /// Advance one step around the ring.
    ///
    /// From an output, moves to the next available output or, past the last
    /// one, to [`Selection::Muted`]. From `Muted`, wraps to the first
    /// available output. With every output available, `len() + 1` calls
    /// visit each output and `Muted` exactly once and return to the start.
    #[must_use]
    pub fn next(&self, current: Selection) -> Selection {
        match current {
            Selection::Output(index) => self.first_available_from(index + 1),
            Selection::Muted => self.first(),
        }
    }

    fn first_available_from(&self, start: usize) -> Selection {
        self.outputs
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, output)| output.available)
            .map_or(Selection::Muted, |(index, _)| Selection::Output(index))
    }

    /// Mark an output as gone. Returns `true` if the id was known.
    pub fn mark_unavailable(&mut self, id: &OutputId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.outputs[index].available = false;
                true
            }
            None => false,
        }
    }

    /// Apply a fresh hardware listing.
    ///
    /// Known outputs are marked available or unavailable depending on whether
    /// they were listed; they keep their position so rotation order is stable.
    /// Unknown outputs are appended in listing order.
    pub fn reconcile(&mut self, discovered: Vec<(OutputId, Volume)>) -> Reconciliation {
        let listed: HashSet<&OutputId> = discovered.iter().map(|(id, _)| id).collect();
        let mut changes = Reconciliation::default();
        for output in &mut self.outputs {
            let available = listed.contains(&output.id);
            match (output.available, available) {
                (false, true) => changes.restored.push(output.id.clone()),
                (true, false) => changes.removed.push(output.id.clone()),
                _ => {}
            }
            output.available = available;
        }

        for (id, volume) in discovered {
            if self.position(&id).is_none() {
                changes.added.push(id.clone());
                self.outputs.push(Output::new(id, volume));
            }
        }
        changes
    }
}

/// What a hardware listing changed in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Outputs seen for the first time, appended to the ring.
    pub added: Vec<OutputId>,
    /// Known outputs that are listed again.
    pub restored: Vec<OutputId>,
    /// Known outputs missing from the listing.
    pub removed: Vec<OutputId>,
}

impl Reconciliation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.restored.is_empty() && self.removed.is_empty()
    }
}
