//! Webhook handlers - authenticated ingress for provider callbacks.

mod handle_webhook;

pub use handle_webhook::{HandlePayazaWebhookHandler, WebhookAck};
