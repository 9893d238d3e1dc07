//! QueueConsumer - Background service that drains queued events.
//!
//! The publishing side writes events to the queue store in the same
//! transaction scope as domain changes; this loop polls the store and
//! dispatches to the registered handlers. Failed events stay pending
//! and are redelivered on a later poll, so handlers see at-least-once
//! delivery.
//!
//! ## Graceful Shutdown
//!
//! The service listens for a shutdown signal and completes the current
//! batch before stopping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::DomainError;
use crate::ports::{EventHandler, QueueSource};

/// Configuration for the QueueConsumer service.
#[derive(Debug, Clone)]
pub struct QueueConsumerConfig {
    /// How often to poll for pending events.
    pub poll_interval: Duration,

    /// Maximum events to process per topic per poll cycle.
    pub batch_size: u32,
}

impl Default for QueueConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
        }
    }
}

impl QueueConsumerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }
}

/// Background service that drains queued events into handlers.
pub struct QueueConsumer {
    source: Arc<dyn QueueSource>,
    handlers: Vec<Arc<dyn EventHandler>>,
    config: QueueConsumerConfig,
}

impl QueueConsumer {
    /// Create a new consumer with default configuration.
    pub fn new(source: Arc<dyn QueueSource>) -> Self {
        Self {
            source,
            handlers: Vec::new(),
            config: QueueConsumerConfig::default(),
        }
    }

    /// Override the polling configuration.
    pub fn with_config(mut self, config: QueueConsumerConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a handler for its topic.
    pub fn register(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Run the consumer loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut interval = time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        // Drain one final batch before exiting.
                        self.process_batch().await?;
                        return Ok(());
                    }
                }

                _ = interval.tick() => {
                    self.process_batch().await?;
                }
            }
        }
    }

    /// Process one batch per registered handler.
    ///
    /// Returns the number of successfully handled events. Also useful
    /// for testing without running the full loop.
    pub async fn process_batch(&self) -> Result<usize, DomainError> {
        let mut handled = 0;

        for handler in &self.handlers {
            let events = self
                .source
                .fetch_pending(handler.topic(), self.config.batch_size)
                .await?;

            for queued in events {
                match handler.handle(queued.envelope.clone()).await {
                    Ok(()) => {
                        self.source.mark_processed(queued.id).await?;
                        handled += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            handler = handler.name(),
                            event_id = %queued.envelope.event_id,
                            attempts = queued.attempts,
                            error = %e,
                            "Event handling failed, leaving pending for redelivery"
                        );
                        self.source.mark_failed(queued.id, &e.to_string()).await?;
                    }
                }
            }
        }

        Ok(handled)
    }

    /// Run exactly one poll cycle (for testing).
    pub async fn poll_once(&self) -> Result<usize, DomainError> {
        self.process_batch().await
    }
}
