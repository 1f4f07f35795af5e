//! Output — one selectable audio sink (speakers, headphones, …).

use serde::{Deserialize, Serialize};

use crate::error::{SoundCtlError, ValidationError};
use crate::id::OutputId;
use crate::volume::Volume;

/// A physical sink together with its last-known volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub id: OutputId,
    pub volume: Volume,
    /// `false` once the hardware stopped reporting this output.
    pub available: bool,
}

impl Output {
    /// Create an available output at the given volume.
    #[must_use]
    pub fn new(id: OutputId, volume: Volume) -> Self {
        Self {
            id,
            volume,
            available: true,
        }
    }

    /// Create a builder for constructing an [`Output`].
    #[must_use]
    pub fn builder() -> OutputBuilder {
        OutputBuilder::default()
    }
}

/// Step-by-step builder for [`Output`].
#[derive(Debug, Default)]
pub struct OutputBuilder {
    name: Option<String>,
    volume: Option<Volume>,
    available: Option<bool>,
}

impl OutputBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn volume(mut self, percent: u8) -> Self {
        self.volume = Some(Volume::new(percent));
        self
    }

    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Consume the builder, validate, and return an [`Output`].
    ///
    /// # Errors
    ///
    /// Returns [`SoundCtlError::Validation`] if the name is missing, empty or
    /// reserved.
    pub fn build(self) -> Result<Output, SoundCtlError> {
        let name = self.name.ok_or(ValidationError::EmptyOutputId)?;
        Ok(Output {
            id: OutputId::new(name)?,
            volume: self.volume.unwrap_or_default(),
            available: self.available.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_available_output_by_default() {
        let output = Output::builder().name("Speaker").volume(40).build().unwrap();
        assert_eq!(output.id.as_str(), "Speaker");
        assert_eq!(output.volume.percent(), 40);
        assert!(output.available);
    }

    #[test]
    fn should_return_validation_error_when_name_missing() {
        let result = Output::builder().volume(10).build();
        assert!(matches!(
            result,
            Err(SoundCtlError::Validation(ValidationError::EmptyOutputId))
        ));
    }

    #[test]
    fn should_clamp_volume_given_to_builder() {
        let output = Output::builder().name("Speaker").volume(180).build().unwrap();
        assert_eq!(output.volume, Volume::MAX);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let output = Output::builder()
            .name("Headphone")
            .volume(65)
            .available(false)
            .build()
            .unwrap();
        let json = serde_json::to_string(&output).unwrap();
        let parsed: Output = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, output);
    }
}
