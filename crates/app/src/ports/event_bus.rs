//! Event bus port — broadcast of `StateChanged` events to observers.

use std::future::Future;

use soundctl_domain::error::SoundCtlError;
use soundctl_domain::event::StateChanged;

/// Publishes state-change events to zero or more passive observers.
///
/// Fire-and-forget: implementations must not wait for observers and must
/// not retry.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: StateChanged)
    -> impl Future<Output = Result<(), SoundCtlError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: StateChanged,
    ) -> impl Future<Output = Result<(), SoundCtlError>> + Send {
        (**self).publish(event)
    }
}
