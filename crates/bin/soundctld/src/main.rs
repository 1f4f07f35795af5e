//! # soundctld — sound control daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Pick the mixer backend and probe the hardware into the initial state
//! - Construct the event bus, the command service and the desktop notifier
//! - Build the axum router, bind to the loopback port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use soundctl_adapter_alsa::AlsaMixer;
use soundctl_adapter_http_axum::router;
use soundctl_adapter_http_axum::state::AppState;
use soundctl_adapter_notify::DesktopNotifier;
use soundctl_adapter_virtual::VirtualMixer;
use soundctl_app::event_bus::InProcessEventBus;
use soundctl_app::ports::Mixer;
use soundctl_app::services::command_service::CommandService;
use soundctl_app::state_machine::StateMachine;
use tracing_subscriber::EnvFilter;

use crate::config::{Backend, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(backend = ?config.mixer.backend, "starting soundctld");
    match config.mixer.backend {
        Backend::Alsa => serve(AlsaMixer::new(&config.mixer.alsa), &config).await,
        Backend::Virtual => serve(VirtualMixer::from_config(&config.mixer.virtual_card), &config).await,
    }
}

async fn serve<M>(mixer: M, config: &Config) -> anyhow::Result<()>
where
    M: Mixer + Send + Sync + 'static,
{
    // State machine
    let machine = StateMachine::bootstrap(mixer, config.state_machine_options()?)
        .await
        .context("failed to probe audio outputs")?;

    // Event bus and observers
    let event_bus = Arc::new(InProcessEventBus::new(config.events.capacity));
    let notifier = config
        .notifications
        .enabled
        .then(|| DesktopNotifier::new(config.notifications.clone()).start(event_bus.subscribe()));

    // IPC
    let service = CommandService::new(machine, Arc::clone(&event_bus));
    let app = router::build(AppState::new(service, event_bus));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("soundctld listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = notifier {
        handle.abort();
    }
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let terminate = async {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "cannot listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        }
        #[cfg(not(unix))]
        std::future::pending::<()>().await;
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
