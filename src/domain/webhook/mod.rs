//! Webhook domain - ingestion of payment provider notifications.
//!
//! The ingress path authenticates the raw request body against the
//! provider's HMAC signature, wraps the payload in a queue envelope,
//! and hands it off for asynchronous reconciliation. Business side
//! effects never run on the request path.

mod envelope;
mod errors;
mod verifier;

pub use envelope::{WebhookEnvelope, WebhookHeaders, PAYAZA_SIGNATURE_HEADER};
pub use errors::WebhookError;
pub use verifier::PayazaWebhookVerifier;

#[cfg(test)]
pub use verifier::compute_test_signature;
