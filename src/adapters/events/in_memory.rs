//! In-memory event queue for testing.
//!
//! Provides synchronous, deterministic publish and drain semantics for
//! unit and integration tests.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in
//! production. It uses `.expect()` on lock operations which will panic
//! if locks are poisoned. Production code uses the PostgreSQL queue.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventPublisher, QueueSource, QueuedEvent};

/// In-memory topic-keyed event queue.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable
/// for test code but this adapter should NOT be used in production.
pub struct InMemoryEventQueue {
    pending: RwLock<HashMap<String, Vec<QueuedEvent>>>,
    published: RwLock<Vec<(String, EventEnvelope)>>,
}

impl InMemoryEventQueue {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Returns every event ever published, with its topic.
    pub fn published_events(&self) -> Vec<(String, EventEnvelope)> {
        self.published
            .read()
            .expect("InMemoryEventQueue: published lock poisoned")
            .clone()
    }

    /// Returns published events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|(_, e)| e.event_type == event_type)
            .map(|(_, e)| e)
            .collect()
    }

    /// Returns published events on a specific topic.
    pub fn events_on_topic(&self, topic: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, e)| e)
            .collect()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_events()
            .iter()
            .any(|(_, e)| e.event_type == event_type)
    }

    /// Returns count of all published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventQueue: published lock poisoned")
            .len()
    }
}

impl Default for InMemoryEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventQueue {
    async fn publish(&self, topic: &str, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .expect("InMemoryEventQueue: published write lock poisoned")
            .push((topic.to_string(), event.clone()));

        self.pending
            .write()
            .expect("InMemoryEventQueue: pending write lock poisoned")
            .entry(topic.to_string())
            .or_default()
            .push(QueuedEvent {
                id: Uuid::new_v4(),
                topic: topic.to_string(),
                envelope: event,
                attempts: 0,
            });

        Ok(())
    }
}

#[async_trait]
impl QueueSource for InMemoryEventQueue {
    async fn fetch_pending(
        &self,
        topic: &str,
        limit: u32,
    ) -> Result<Vec<QueuedEvent>, DomainError> {
        let pending = self
            .pending
            .read()
            .expect("InMemoryEventQueue: pending lock poisoned");
        Ok(pending
            .get(topic)
            .map(|events| events.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn mark_processed(&self, id: Uuid) -> Result<(), DomainError> {
        let mut pending = self
            .pending
            .write()
            .expect("InMemoryEventQueue: pending write lock poisoned");
        for events in pending.values_mut() {
            events.retain(|e| e.id != id);
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, _error: &str) -> Result<(), DomainError> {
        let mut pending = self
            .pending
            .write()
            .expect("InMemoryEventQueue: pending write lock poisoned");
        for events in pending.values_mut() {
            if let Some(event) = events.iter_mut().find(|e| e.id == id) {
                event.attempts += 1;
            }
        }
        Ok(())
    }
}
