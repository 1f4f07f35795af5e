//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod outputs;
pub mod snapshot;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use soundctl_app::ports::{EventPublisher, Mixer};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<M, P>() -> Router<AppState<M, P>>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Commands
        .route("/volume_up", post(commands::volume_up::<M, P>))
        .route("/volume_down", post(commands::volume_down::<M, P>))
        .route("/cycle_outputs", post(commands::cycle_outputs::<M, P>))
        .route("/notify_volume", post(commands::notify_volume::<M, P>))
        .route("/notify_outputs", post(commands::notify_outputs::<M, P>))
        // Queries
        .route("/state", get(snapshot::get::<M, P>))
        .route("/outputs", get(outputs::list::<M, P>))
        .route("/outputs/rescan", post(outputs::rescan::<M, P>))
        // Broadcast
        .route("/events/stream", get(sse::stream::<M, P>))
}
