//! Shared application state for axum handlers.

use std::sync::Arc;

use soundctl_app::event_bus::InProcessEventBus;
use soundctl_app::ports::{EventPublisher, Mixer};
use soundctl_app::services::command_service::CommandService;

/// Application state shared across all axum handlers.
///
/// Generic over the mixer and the event publisher to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<M, P> {
    /// The serialized command entry point.
    pub command_service: Arc<CommandService<M, P>>,
    /// Broadcast bus the SSE stream subscribes to.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<M, P> Clone for AppState<M, P> {
    fn clone(&self) -> Self {
        Self {
            command_service: Arc::clone(&self.command_service),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<M, P> AppState<M, P>
where
    M: Mixer + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    pub fn new(command_service: CommandService<M, P>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self::from_arcs(Arc::new(command_service), event_bus)
    }

    /// Create the state from an already shared command service.
    pub fn from_arcs(
        command_service: Arc<CommandService<M, P>>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            command_service,
            event_bus,
        }
    }
}
