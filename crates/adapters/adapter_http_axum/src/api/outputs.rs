//! Output registry endpoints.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use soundctl_app::ports::{EventPublisher, Mixer};
use soundctl_domain::output::Output;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the output endpoints.
pub enum OutputsResponse {
    Ok(Json<Vec<Output>>),
}

impl IntoResponse for OutputsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/outputs`
pub async fn list<M, P>(State(state): State<AppState<M, P>>) -> OutputsResponse
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    OutputsResponse::Ok(Json(state.command_service.outputs().await))
}

/// `POST /api/outputs/rescan`
pub async fn rescan<M, P>(
    State(state): State<AppState<M, P>>,
) -> Result<OutputsResponse, ApiError>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let outputs = state.command_service.rescan().await?;
    Ok(OutputsResponse::Ok(Json(outputs)))
}
