//! HTTP adapters - axum routes for the webhook ingress.
//!
//! The only inbound HTTP surface is the payment provider callback plus
//! a liveness probe; everything else in the system is queue-driven.

pub mod webhook;

pub use webhook::{webhook_router, WebhookAppState};
