//! Volume percentages and volume steps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Integer volume percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Build a volume, clamping anything above 100.
    #[must_use]
    pub fn new(percent: u8) -> Self {
        Self(percent.min(Self::MAX.0))
    }

    /// Build a volume from a wider integer (hardware readings), clamping into range.
    #[must_use]
    pub fn saturating_from(percent: i64) -> Self {
        let clamped = percent.clamp(0, i64::from(Self::MAX.0));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Increase by `step`, saturating at 100.
    #[must_use]
    pub fn raise(self, step: Step) -> Self {
        Self::new(self.0.saturating_add(step.0))
    }

    /// Decrease by `step`, saturating at 0.
    #[must_use]
    pub fn lower(self, step: Step) -> Self {
        Self(self.0.saturating_sub(step.0))
    }
}

impl From<u8> for Volume {
    fn from(percent: u8) -> Self {
        Self::new(percent)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Amount a single volume command moves the active output by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Step(u8);

impl Step {
    /// Default increment for `volume_up` / `volume_down`.
    pub const DEFAULT: Self = Self(5);

    /// # Errors
    ///
    /// Returns [`ValidationError::StepOutOfRange`] unless `1 <= amount <= 100`.
    pub fn new(amount: u16) -> Result<Self, ValidationError> {
        match u8::try_from(amount) {
            Ok(value @ 1..=100) => Ok(Self(value)),
            _ => Err(ValidationError::StepOutOfRange(amount)),
        }
    }

    #[must_use]
    pub fn amount(self) -> u8 {
        self.0
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for Step {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Step> for u16 {
    fn from(step: Step) -> Self {
        u16::from(step.0)
    }
}
