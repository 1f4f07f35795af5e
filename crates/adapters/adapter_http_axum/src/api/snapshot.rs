//! `GET /api/state` — read-only view of the daemon state.

use axum::Json;
use axum::extract::State;

use soundctl_app::ports::{EventPublisher, Mixer};
use soundctl_domain::event::StateSnapshot;

use crate::state::AppState;

/// `GET /api/state`
pub async fn get<M, P>(State(state): State<AppState<M, P>>) -> Json<StateSnapshot>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Json(state.command_service.current_state().await)
}

#[cfg(test)]
mod tests {
    use crate::testing::{Harness, get, post};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn should_return_initial_state() {
        let harness = Harness::new().await;

        let (status, body) = harness.call(get("/api/state")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activeOutput"], "Speaker");
        assert_eq!(body["volumePercent"], 40);
        assert_eq!(body["muted"], false);
    }

    #[tokio::test]
    async fn should_report_muted_after_full_rotation() {
        let harness = Harness::new().await;
        harness.call(post("/api/cycle_outputs")).await;
        harness.call(post("/api/cycle_outputs")).await;

        let (_, body) = harness.call(get("/api/state")).await;

        assert_eq!(
            body,
            serde_json::json!({"activeOutput": "muted", "volumePercent": 0, "muted": true})
        );
    }
}
