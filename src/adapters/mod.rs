//! Adapters - Implementations of the ports.
//!
//! Each submodule binds a port to a concrete technology:
//!
//! - `postgres` - sqlx-backed repositories and queue storage
//! - `payaza` - Payaza virtual account provider over reqwest
//! - `events` - event queue publisher, consumer loop, in-memory bus
//! - `http` - axum routes for the webhook ingress
//! - `memory` - in-memory repositories for tests
//! - `notify` - log-only notifier

pub mod events;
pub mod http;
pub mod memory;
pub mod notify;
pub mod payaza;
pub mod postgres;

pub use events::{InMemoryEventQueue, QueueConsumer, QueueConsumerConfig};
pub use notify::LogNotifier;
pub use payaza::{PayazaAdapter, PayazaConfig};
