//! # soundctl — sound control client
//!
//! Sends one command to a running `soundctld` and prints the resulting state.
//! Meant to be bound to media keys:
//!
//! ```text
//! soundctl volume_up        # XF86AudioRaiseVolume
//! soundctl volume_down 10   # Shift+XF86AudioLowerVolume
//! soundctl cycle_outputs    # XF86AudioMute
//! ```
//!
//! Exit codes: `0` success, `1` the daemon reported a failure or answered
//! with garbage, `2` usage error, `3` the daemon could not be reached.

mod client;
mod sse;

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use soundctl_domain::event::StateSnapshot;
use soundctl_domain::output::Output;
use tracing_subscriber::EnvFilter;

use crate::client::{ClientError, SoundCtlClient};

#[derive(Parser)]
#[command(name = "soundctl", version, about = "Control the soundctld volume daemon")]
struct Cli {
    /// Base URL of the daemon.
    #[arg(long, env = "SOUNDCTL_URL", default_value = "http://127.0.0.1:7870")]
    url: String,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Print raw JSON instead of a one-line summary.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
enum Commands {
    /// Raise the active output's volume.
    VolumeUp {
        /// Percentage points to add (defaults to the daemon's step).
        #[arg(value_parser = clap::value_parser!(u16).range(1..=100))]
        amount: Option<u16>,
    },
    /// Lower the active output's volume.
    VolumeDown {
        /// Percentage points to remove (defaults to the daemon's step).
        #[arg(value_parser = clap::value_parser!(u16).range(1..=100))]
        amount: Option<u16>,
    },
    /// Switch to the next output, or mute after the last one.
    CycleOutputs,
    /// Print the current state.
    GetState,
    /// List every known output.
    Outputs,
    /// Ask the daemon to look for new or vanished outputs.
    Rescan,
    /// Show the current volume notification again.
    NotifyVolume,
    /// Show the current output notification again.
    NotifyOutputs,
    /// Print every state change until interrupted.
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SOUNDCTL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("soundctl: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let client = SoundCtlClient::new(&cli.url, Duration::from_millis(cli.timeout_ms))?;
    let json = cli.json;

    match cli.command {
        Commands::VolumeUp { amount } => print_state(&client.volume_up(amount).await?, json),
        Commands::VolumeDown { amount } => print_state(&client.volume_down(amount).await?, json),
        Commands::CycleOutputs => print_state(&client.cycle_outputs().await?, json),
        Commands::GetState => print_state(&client.state().await?, json),
        Commands::Outputs => print_outputs(&client.outputs().await?, json),
        Commands::Rescan => print_outputs(&client.rescan().await?, json),
        Commands::NotifyVolume => print_state(&client.notify_volume().await?, json),
        Commands::NotifyOutputs => print_state(&client.notify_outputs().await?, json),
        Commands::Watch => {
            client
                .watch(|event| {
                    if json {
                        print_json(&event);
                    } else {
                        println!("{} {}", event.command, summary(&event.state));
                    }
                })
                .await?;
        }
    }
    Ok(())
}

fn summary(state: &StateSnapshot) -> String {
    if state.muted {
        state.active_output.clone()
    } else {
        format!("{} {}%", state.active_output, state.volume_percent)
    }
}

fn print_state(state: &StateSnapshot, json: bool) {
    if json {
        print_json(state);
    } else {
        println!("{}", summary(state));
    }
}

fn print_outputs(outputs: &[Output], json: bool) {
    if json {
        print_json(&outputs);
        return;
    }
    for output in outputs {
        let note = if output.available { "" } else { " (unavailable)" };
        println!("{} {}{note}", output.id, output.volume);
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "cannot encode output"),
    }
}
