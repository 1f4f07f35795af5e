//! Output identifier newtype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Label used on the wire for the Mute sentinel. Never a valid [`OutputId`].
pub const MUTED_LABEL: &str = "muted";

/// Stable name of one physical sink (e.g. an ALSA simple mixer control).
///
/// Guaranteed non-empty and distinct from [`MUTED_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputId(String);

impl OutputId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyOutputId`] for blank names and
    /// [`ValidationError::ReservedOutputId`] for the mute label.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyOutputId);
        }
        if name.eq_ignore_ascii_case(MUTED_LABEL) {
            return Err(ValidationError::ReservedOutputId(name));
        }
        Ok(Self(name))
    }

    /// Access the inner name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OutputId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OutputId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputId> for String {
    fn from(id: OutputId) -> Self {
        id.0
    }
}

impl AsRef<str> for OutputId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
