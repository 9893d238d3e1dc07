//! Event transport adapters.

mod consumer;
mod in_memory;
mod postgres_queue;

pub use consumer::{QueueConsumer, QueueConsumerConfig};
pub use in_memory::InMemoryEventQueue;
pub use postgres_queue::PostgresEventQueue;
