//! Server-Sent Events (SSE) stream of state changes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use soundctl_app::ports::{EventPublisher, Mixer};

use crate::state::AppState;

/// SSE event name of every frame on the stream.
pub const STATE_CHANGED: &str = "StateChanged";

/// `GET /api/events/stream` — SSE stream of `StateChanged` broadcasts.
///
/// Subscribes to the event bus and sends each event as a JSON `data:` frame
/// named [`STATE_CHANGED`]. The stream continues until the client disconnects
/// or the event bus is closed.
pub async fn stream<M, P>(
    State(state): State<AppState<M, P>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event(STATE_CHANGED).data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
