//! Event ports - publishing and consuming domain events.
//!
//! `EventPublisher` defines how the application publishes events to
//! named topics without knowing about the underlying transport
//! (in-memory, queue table, message broker). `QueueSource` and
//! `EventHandler` define the consuming side: a background consumer
//! polls a source and dispatches envelopes to registered handlers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Topic carrying authenticated payment webhooks to the reconciler.
pub const TOPIC_INCOMING_PAYMENTS: &str = "payaza_incoming_payment";

/// Topic carrying membership lifecycle events.
pub const TOPIC_MEMBERSHIP_EVENTS: &str = "membership_events";

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (consumers may see duplicates)
/// - Errors are propagated to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event to a topic.
    async fn publish(&self, topic: &str, event: EventEnvelope) -> Result<(), DomainError>;
}

/// A queued event awaiting consumption.
#[derive(Debug, Clone)]
pub struct QueuedEvent {
    /// Queue-level id, distinct from the envelope's event id.
    pub id: Uuid,
    pub topic: String,
    pub envelope: EventEnvelope,
    /// Delivery attempts so far.
    pub attempts: i32,
}

/// Port for draining queued events.
///
/// Backed by the same store the matching `EventPublisher` writes to.
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Fetch up to `limit` pending events for a topic, oldest first.
    async fn fetch_pending(&self, topic: &str, limit: u32)
        -> Result<Vec<QueuedEvent>, DomainError>;

    /// Mark an event as successfully consumed.
    async fn mark_processed(&self, id: Uuid) -> Result<(), DomainError>;

    /// Mark an event as failed; it stays pending for redelivery.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;
}

/// Handler that processes events from one topic.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Topic this handler consumes.
    fn topic(&self) -> &str;

    /// Handler name for logging.
    fn name(&self) -> &'static str;

    /// Process a single event.
    ///
    /// Handlers must tolerate redelivery: the queue is at-least-once.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }

    #[test]
    fn queue_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn QueueSource) {}
    }

    #[test]
    fn event_handler_is_object_safe() {
        fn _accepts_dyn(_handler: &dyn EventHandler) {}
    }
}
