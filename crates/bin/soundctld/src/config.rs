//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `soundctld.toml` in the working directory, or at the path named
//! by `SOUNDCTLD_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use soundctl_adapter_alsa::AlsaConfig;
use soundctl_adapter_notify::NotifyConfig;
use soundctl_adapter_virtual::VirtualConfig;
use soundctl_adapter_virtual::config::VirtualOutputConfig;
use soundctl_app::state_machine::StateMachineOptions;
use soundctl_domain::error::ValidationError;
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Step;

const DEFAULT_PATH: &str = "soundctld.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IPC listener settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Volume step and hardware timeout.
    pub volume: VolumeConfig,
    /// Which mixer drives the hardware.
    pub mixer: MixerConfig,
    /// Desktop notifications.
    pub notifications: NotifyConfig,
    /// Broadcast channel settings.
    pub events: EventsConfig,
}

/// IPC listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to loopback: the daemon is per-user.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Default increment of the volume commands, 1 to 100.
    pub step: u16,
    /// Upper bound on every mixer call, in milliseconds.
    pub hardware_timeout_ms: u64,
}

/// Mixer backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Alsa,
    Virtual,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "alsa" => Ok(Self::Alsa),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown mixer backend {other:?}, expected \"alsa\" or \"virtual\""
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub backend: Backend,
    pub alsa: AlsaConfig,
    #[serde(rename = "virtual")]
    pub virtual_card: VirtualConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Events a slow subscriber may fall behind before losing some.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SOUNDCTLD_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("SOUNDCTLD_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("SOUNDCTLD_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SOUNDCTLD_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("SOUNDCTLD_MIXER") {
            self.mixer.backend = val.parse()?;
        }
        if let Some(val) = var("SOUNDCTLD_OUTPUTS") {
            self.override_outputs(&val)?;
        }
        if let Some(val) = var("SOUNDCTLD_STEP") {
            self.volume.step = val
                .parse()
                .map_err(|_| ConfigError::Validation(format!("step {val:?} is not a number")))?;
        }
        if let Some(val) = var("SOUNDCTLD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    /// Replace the output list of both backends with a colon-separated list.
    fn override_outputs(&mut self, list: &str) -> Result<(), ConfigError> {
        let outputs = list
            .split(':')
            .filter(|name| !name.is_empty())
            .map(OutputId::new)
            .collect::<Result<Vec<_>, _>>()?;

        let volumes = self
            .mixer
            .virtual_card
            .outputs
            .iter()
            .map(|output| (output.name.clone(), output.volume))
            .collect::<Vec<_>>();
        self.mixer.virtual_card.outputs = outputs
            .iter()
            .map(|name| VirtualOutputConfig {
                volume: volumes
                    .iter()
                    .find(|(known, _)| known == name)
                    .map_or(50, |(_, volume)| *volume),
                name: name.clone(),
            })
            .collect();
        self.mixer.alsa.outputs = outputs;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        Step::new(self.volume.step)?;
        if self.volume.hardware_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "hardware_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::Validation(
                "events capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Tunables handed to the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Value`] if the configured step is out of range.
    pub fn state_machine_options(&self) -> Result<StateMachineOptions, ConfigError> {
        Ok(StateMachineOptions {
            step: Step::new(self.volume.step)?,
            hardware_timeout: Duration::from_millis(self.volume.hardware_timeout_ms),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7870,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "soundctld=info,soundctl=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            step: u16::from(Step::DEFAULT.amount()),
            hardware_timeout_ms: 300,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A value rejected by the domain (output name, step).
    #[error("invalid configuration value")]
    Value(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
