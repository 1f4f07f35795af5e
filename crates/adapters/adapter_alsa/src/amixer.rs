//! Thin async wrapper around the `amixer` command-line tool and parsers for
//! its output.

use std::path::PathBuf;

use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;
use tokio::process::Command;

use crate::config::AlsaConfig;
use crate::error::AlsaError;

const UNKNOWN_CONTROL: &str = "Unable to find simple control";

/// How to invoke `amixer` for one card.
#[derive(Debug, Clone)]
pub(crate) struct Amixer {
    program: PathBuf,
    target: Vec<String>,
}

impl Amixer {
    pub(crate) fn from_config(config: &AlsaConfig) -> Self {
        let target = match (&config.device, &config.card) {
            (Some(device), _) => vec!["-D".to_string(), device.clone()],
            (None, Some(card)) => vec!["-c".to_string(), card.clone()],
            (None, None) => Vec::new(),
        };
        Self {
            program: config.amixer.clone(),
            target,
        }
    }

    pub(crate) async fn scontrols(&self) -> Result<Vec<String>, AlsaError> {
        let stdout = self.run(&["scontrols"]).await?;
        Ok(parse_scontrols(&stdout))
    }

    pub(crate) async fn get_volume(&self, control: &OutputId) -> Result<Volume, AlsaError> {
        let stdout = self.run_on(control, &["sget", control.as_str()]).await?;
        parse_volume(&stdout).ok_or_else(|| AlsaError::Parse {
            control: control.to_string(),
            reason: "no playback volume percentage",
        })
    }

    pub(crate) async fn set_volume(&self, control: &OutputId, volume: Volume) -> Result<(), AlsaError> {
        let level = format!("{}%", volume.percent());
        self.run_on(control, &["-q", "sset", control.as_str(), level.as_str()])
            .await
            .map(drop)
    }

    pub(crate) async fn set_switch(&self, control: &OutputId, on: bool) -> Result<(), AlsaError> {
        let switch = if on { "unmute" } else { "mute" };
        self.run_on(control, &["-q", "sset", control.as_str(), switch])
            .await
            .map(drop)
    }

    /// Like [`Self::run`], but reports a missing control as
    /// [`AlsaError::UnknownControl`].
    async fn run_on(&self, control: &OutputId, args: &[&str]) -> Result<String, AlsaError> {
        match self.run(args).await {
            Err(AlsaError::Command { stderr, .. }) if stderr.contains(UNKNOWN_CONTROL) => {
                Err(AlsaError::UnknownControl(control.clone()))
            }
            other => other,
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, AlsaError> {
        tracing::trace!(program = %self.program.display(), ?args, "running amixer");
        let output = Command::new(&self.program)
            .args(&self.target)
            .args(args)
            .env("LC_ALL", "C")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(AlsaError::Spawn)?;

        if !output.status.success() {
            return Err(AlsaError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract control names from `amixer scontrols`, whose lines look like
/// `Simple mixer control 'Master',0`.
pub(crate) fn parse_scontrols(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let start = line.find('\'')? + 1;
            let end = line.rfind('\'')?;
            (end > start).then(|| line[start..end].to_string())
        })
        .collect()
}

/// Mean of the playback channel percentages reported by `amixer sget`.
pub(crate) fn parse_volume(stdout: &str) -> Option<Volume> {
    let percentages: Vec<i64> = stdout
        .lines()
        .filter(|line| line.contains("Playback") && !line.trim_start().starts_with("Limits"))
        .filter_map(first_percentage)
        .collect();
    if percentages.is_empty() {
        return None;
    }
    let count = i64::try_from(percentages.len()).ok()?;
    let sum: i64 = percentages.iter().sum();
    Some(Volume::saturating_from(sum / count))
}

fn first_percentage(line: &str) -> Option<i64> {
    let start = line.find('[')? + 1;
    let rest = &line[start..];
    let end = rest.find("%]")?;
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO: &str = "\
Simple mixer control 'Master',0
  Capabilities: pvolume pswitch pswitch-joined
  Playback channels: Front Left - Front Right
  Limits: Playback 0 - 87
  Mono:
  Front Left: Playback 52 [60%] [-26.25dB] [on]
  Front Right: Playback 50 [57%] [-27.75dB] [on]
";

    const MONO: &str = "\
Simple mixer control 'Speaker',0
  Capabilities: pvolume pvolume-joined pswitch pswitch-joined
  Playback channels: Mono
  Limits: Playback 0 - 87
  Mono: Playback 87 [100%] [0.00dB] [off]
";

    #[test]
    fn should_parse_control_names() {
        let stdout = "Simple mixer control 'Master',0\n\
                      Simple mixer control 'Headphone',0\n\
                      Simple mixer control 'Mic Boost',1\n";
        assert_eq!(
            parse_scontrols(stdout),
            vec!["Master", "Headphone", "Mic Boost"]
        );
    }

    #[test]
    fn should_skip_lines_without_control_name() {
        assert!(parse_scontrols("\nwarning: something\n").is_empty());
    }

    #[test]
    fn should_average_channel_percentages() {
        assert_eq!(parse_volume(STEREO), Some(Volume::new(58)));
    }

    #[test]
    fn should_parse_mono_control() {
        assert_eq!(parse_volume(MONO), Some(Volume::MAX));
    }

    #[test]
    fn should_return_none_without_playback_volume() {
        let capture_only = "Simple mixer control 'Capture',0\n  Front Left: Capture 40 [63%] [on]\n";
        assert_eq!(parse_volume(capture_only), None);
    }

    #[test]
    fn should_target_device_before_card() {
        let config = AlsaConfig {
            card: Some("1".to_string()),
            device: Some("pulse".to_string()),
            ..AlsaConfig::default()
        };
        assert_eq!(Amixer::from_config(&config).target, vec!["-D", "pulse"]);

        let config = AlsaConfig {
            card: Some("1".to_string()),
            ..AlsaConfig::default()
        };
        assert_eq!(Amixer::from_config(&config).target, vec!["-c", "1"]);
    }

    #[tokio::test]
    async fn should_report_spawn_failure() {
        let config = AlsaConfig {
            amixer: PathBuf::from("/nonexistent/amixer"),
            ..AlsaConfig::default()
        };
        let err = Amixer::from_config(&config).scontrols().await.unwrap_err();
        assert!(matches!(err, AlsaError::Spawn(_)));
    }
}
