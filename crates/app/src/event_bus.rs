//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use soundctl_domain::error::SoundCtlError;
use soundctl_domain::event::StateChanged;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing never blocks and succeeds even when there are no active
/// subscribers (the event is simply dropped). A subscriber that falls more
/// than `capacity` events behind loses the oldest ones.
pub struct InProcessEventBus {
    sender: broadcast::Sender<StateChanged>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(
        &self,
        event: StateChanged,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send {
        // send only fails when nobody is listening
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(delivered, "state change broadcast");
        async { Ok(()) }
    }
}
