//! Router test harness backed by the virtual mixer.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use soundctl_adapter_virtual::VirtualMixer;
use soundctl_app::event_bus::InProcessEventBus;
use soundctl_app::services::command_service::CommandService;
use soundctl_app::state_machine::{StateMachine, StateMachineOptions};
use soundctl_domain::id::OutputId;
use soundctl_domain::volume::Volume;
use tower::ServiceExt;

use crate::state::AppState;

pub type TestState = AppState<Arc<VirtualMixer>, Arc<InProcessEventBus>>;

pub struct Harness {
    pub mixer: Arc<VirtualMixer>,
    pub state: TestState,
}

impl Harness {
    /// `Speaker` at 40 % (active) and `Headphone` at 70 %.
    pub async fn new() -> Self {
        let mixer = Arc::new(VirtualMixer::new([
            (OutputId::new("Speaker").unwrap(), Volume::new(40)),
            (OutputId::new("Headphone").unwrap(), Volume::new(70)),
        ]));
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let machine = StateMachine::bootstrap(Arc::clone(&mixer), StateMachineOptions::default())
            .await
            .unwrap();
        let service = CommandService::new(machine, Arc::clone(&event_bus));
        Self {
            mixer,
            state: AppState::new(service, event_bus),
        }
    }

    pub fn router(&self) -> Router {
        crate::router::build(self.state.clone())
    }

    pub fn plug(&self, name: &str, volume: u8) {
        self.mixer.plug(OutputId::new(name).unwrap(), Volume::new(volume));
    }

    pub fn unplug(&self, name: &str) {
        assert!(self.mixer.unplug(&OutputId::new(name).unwrap()));
    }

    /// Send one request and decode the JSON response body.
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri)
}

pub fn post(uri: &str) -> Request<Body> {
    request(Method::POST, uri)
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
