//! Command endpoints: one POST per daemon command.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use soundctl_app::ports::{EventPublisher, Mixer};
use soundctl_domain::error::ValidationError;
use soundctl_domain::event::StateSnapshot;
use soundctl_domain::volume::Step;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional explicit increment, `?amount=N`.
#[derive(Debug, Default, Deserialize)]
pub struct AmountQuery {
    pub amount: Option<u16>,
}

impl AmountQuery {
    fn step(&self) -> Result<Option<Step>, ValidationError> {
        self.amount.map(Step::new).transpose()
    }
}

/// Possible responses from a command endpoint.
pub enum CommandResponse {
    Ok(Json<StateSnapshot>),
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/volume_up`
pub async fn volume_up<M, P>(
    State(state): State<AppState<M, P>>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> Result<CommandResponse, ApiError>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let Query(query) = query?;
    let service = &state.command_service;
    let snapshot = match query.step()? {
        Some(step) => service.volume_up_by(step).await?,
        None => service.volume_up().await?,
    };
    Ok(CommandResponse::Ok(Json(snapshot)))
}

/// `POST /api/volume_down`
pub async fn volume_down<M, P>(
    State(state): State<AppState<M, P>>,
    query: Result<Query<AmountQuery>, QueryRejection>,
) -> Result<CommandResponse, ApiError>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let Query(query) = query?;
    let service = &state.command_service;
    let snapshot = match query.step()? {
        Some(step) => service.volume_down_by(step).await?,
        None => service.volume_down().await?,
    };
    Ok(CommandResponse::Ok(Json(snapshot)))
}

/// `POST /api/cycle_outputs`
pub async fn cycle_outputs<M, P>(
    State(state): State<AppState<M, P>>,
) -> Result<CommandResponse, ApiError>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let snapshot = state.command_service.cycle_outputs().await?;
    Ok(CommandResponse::Ok(Json(snapshot)))
}

/// `POST /api/notify_volume`
pub async fn notify_volume<M, P>(State(state): State<AppState<M, P>>) -> CommandResponse
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    CommandResponse::Ok(Json(state.command_service.notify_volume().await))
}

/// `POST /api/notify_outputs`
pub async fn notify_outputs<M, P>(State(state): State<AppState<M, P>>) -> CommandResponse
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    CommandResponse::Ok(Json(state.command_service.notify_outputs().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, post};
    use axum::http::StatusCode;

    #[test]
    fn should_accept_missing_amount() {
        assert_eq!(AmountQuery::default().step(), Ok(None));
    }

    #[test]
    fn should_reject_out_of_range_amount() {
        let query = AmountQuery { amount: Some(101) };
        assert_eq!(query.step(), Err(ValidationError::StepOutOfRange(101)));
    }

    #[tokio::test]
    async fn should_raise_volume_by_default_step() {
        let harness = Harness::new().await;

        let (status, body) = harness.call(post("/api/volume_up")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"activeOutput": "Speaker", "volumePercent": 45, "muted": false})
        );
    }

    #[tokio::test]
    async fn should_lower_volume_by_explicit_amount() {
        let harness = Harness::new().await;

        let (status, body) = harness.call(post("/api/volume_down?amount=25")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["volumePercent"], 15);
        assert_eq!(harness.mixer.output("Speaker").unwrap().volume.percent(), 15);
    }

    #[tokio::test]
    async fn should_reject_zero_amount() {
        let harness = Harness::new().await;

        let (status, body) = harness.call(post("/api/volume_up?amount=0")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert_eq!(harness.mixer.output("Speaker").unwrap().volume.percent(), 40);
    }

    #[tokio::test]
    async fn should_reject_unparsable_amount_as_json() {
        let harness = Harness::new().await;

        for uri in ["/api/volume_up?amount=loud", "/api/volume_down?amount=70000"] {
            let (status, body) = harness.call(post(uri)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["kind"], "validation_error", "{uri}");
            assert!(body["error"].as_str().unwrap().starts_with("malformed request"));
        }
        assert_eq!(harness.mixer.output("Speaker").unwrap().volume.percent(), 40);
    }

    #[tokio::test]
    async fn should_reannounce_state_without_changing_it() {
        let harness = Harness::new().await;
        let mut events = harness.state.event_bus.subscribe();

        let (status, body) = harness.call(post("/api/notify_outputs")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activeOutput"], "Speaker");
        let event = events.recv().await.unwrap();
        assert_eq!(event.command, soundctl_domain::command::Command::NotifyOutputs);
        assert_eq!(harness.mixer.output("Speaker").unwrap().volume.percent(), 40);
    }

    #[tokio::test]
    async fn should_cycle_to_next_output() {
        let harness = Harness::new().await;

        let (status, body) = harness.call(post("/api/cycle_outputs")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activeOutput"], "Headphone");
        assert_eq!(body["volumePercent"], 70);
        assert!(!harness.mixer.output("Speaker").unwrap().active);
        assert!(harness.mixer.output("Headphone").unwrap().active);
    }

    #[tokio::test]
    async fn should_report_unplugged_target_as_service_unavailable() {
        let harness = Harness::new().await;
        harness.unplug("Headphone");

        let (status, body) = harness.call(post("/api/cycle_outputs")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "hardware_unavailable");
        let (_, state) = harness.call(crate::testing::get("/api/state")).await;
        assert_eq!(state["activeOutput"], "Speaker");
    }
}
