//! End-to-end smoke tests for the full soundctld stack.
//!
//! Each test wires the complete application (virtual mixer, real state
//! machine, real command service and event bus, real axum router) and
//! exercises the IPC layer via `tower::ServiceExt::oneshot` — no TCP port is
//! bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use soundctl_adapter_http_axum::router;
use soundctl_adapter_http_axum::state::AppState;
use soundctl_adapter_virtual::VirtualMixer;
use soundctl_app::event_bus::InProcessEventBus;
use soundctl_app::services::command_service::CommandService;
use soundctl_app::state_machine::{StateMachine, StateMachineOptions};
use soundctl_domain::command::Command;
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;
use tower::ServiceExt;

struct Stack {
    mixer: Arc<VirtualMixer>,
    event_bus: Arc<InProcessEventBus>,
    app: axum::Router,
}

/// Speakers at 40 %, Headphones at 70 %.
async fn stack(options: StateMachineOptions) -> Stack {
    let mixer = Arc::new(VirtualMixer::new([
        (OutputId::new("Speakers").unwrap(), Volume::new(40)),
        (OutputId::new("Headphones").unwrap(), Volume::new(70)),
    ]));
    let event_bus = Arc::new(InProcessEventBus::new(64));
    let machine = StateMachine::bootstrap(Arc::clone(&mixer), options)
        .await
        .expect("virtual mixer should bootstrap");
    let service = CommandService::new(machine, Arc::clone(&event_bus));
    let app = router::build(AppState::new(service, Arc::clone(&event_bus)));
    Stack {
        mixer,
        event_bus,
        app,
    }
}

async fn call(app: &axum::Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn active(mixer: &VirtualMixer) -> Vec<String> {
    mixer
        .outputs()
        .into_iter()
        .filter(|output| output.active)
        .map(|output| output.id.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_make_first_output_exclusive_at_startup() {
    let stack = stack(StateMachineOptions::default()).await;

    let (status, body) = call(&stack.app, Method::GET, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeOutput"], "Speakers");
    assert_eq!(body["volumePercent"], 40);
    assert_eq!(active(&stack.mixer), vec!["Speakers"]);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_raise_active_output_twice() {
    let stack = stack(StateMachineOptions::default()).await;

    call(&stack.app, Method::POST, "/api/volume_up").await;
    let (_, body) = call(&stack.app, Method::POST, "/api/volume_up").await;

    assert_eq!(body["activeOutput"], "Speakers");
    assert_eq!(body["volumePercent"], 50);
    assert_eq!(stack.mixer.output("Speakers").unwrap().volume.percent(), 50);
    assert_eq!(stack.mixer.output("Headphones").unwrap().volume.percent(), 70);
}

#[tokio::test]
async fn should_walk_the_output_ring() {
    let stack = stack(StateMachineOptions::default()).await;

    let (_, first) = call(&stack.app, Method::POST, "/api/cycle_outputs").await;
    assert_eq!(first["activeOutput"], "Headphones");
    assert_eq!(first["volumePercent"], 70);
    assert_eq!(active(&stack.mixer), vec!["Headphones"]);

    let (_, second) = call(&stack.app, Method::POST, "/api/cycle_outputs").await;
    assert_eq!(second["activeOutput"], "muted");
    assert_eq!(second["muted"], true);
    assert!(active(&stack.mixer).is_empty());

    let (_, third) = call(&stack.app, Method::POST, "/api/cycle_outputs").await;
    assert_eq!(third["activeOutput"], "Speakers");
    assert_eq!(third["volumePercent"], 40);
    assert_eq!(active(&stack.mixer), vec!["Speakers"]);
}

#[tokio::test]
async fn should_keep_selection_when_target_vanishes() {
    let stack = stack(StateMachineOptions::default()).await;
    let mut events = stack.event_bus.subscribe();
    stack.mixer.unplug(&OutputId::new("Headphones").unwrap());

    let (status, body) = call(&stack.app, Method::POST, "/api/cycle_outputs").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "hardware_unavailable");
    let (_, state) = call(&stack.app, Method::GET, "/api/state").await;
    assert_eq!(state["activeOutput"], "Speakers");
    assert_eq!(active(&stack.mixer), vec!["Speakers"]);
    assert!(events.try_recv().is_err());

    // the vanished output is skipped from now on
    let (status, body) = call(&stack.app, Method::POST, "/api/cycle_outputs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeOutput"], "muted");
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_broadcast_each_successful_command() {
    let stack = stack(StateMachineOptions::default()).await;
    let mut events = stack.event_bus.subscribe();

    call(&stack.app, Method::POST, "/api/volume_down?amount=10").await;
    call(&stack.app, Method::POST, "/api/cycle_outputs").await;

    let first = events.recv().await.unwrap();
    assert_eq!(first.command, Command::VolumeDown);
    assert_eq!(first.state.volume_percent, 30);
    let second = events.recv().await.unwrap();
    assert_eq!(second.command, Command::CycleOutputs);
    assert_eq!(second.state.active_output, "Headphones");
    assert!(events.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Hardware timeouts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_slow_hardware_as_unavailable() {
    let options = StateMachineOptions {
        hardware_timeout: Duration::from_millis(20),
        ..StateMachineOptions::default()
    };
    let stack = stack(options).await;
    stack.mixer.set_delay(Some(Duration::from_millis(200)));

    let (status, body) = call(&stack.app, Method::POST, "/api/volume_up").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "hardware_unavailable");

    stack.mixer.set_delay(None);
    let (_, state) = call(&stack.app, Method::GET, "/api/state").await;
    assert_eq!(state["volumePercent"], 40);
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = stack(StateMachineOptions::default()).await;

    let response = stack
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
