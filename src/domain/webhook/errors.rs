//! Webhook error types with HTTP status mapping and retryability.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur on the webhook ingress path.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was absent from the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The body was not valid JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The authenticated envelope could not be handed to the queue.
    #[error("Enqueue failed: {0}")]
    EnqueueFailed(String),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this event.
    ///
    /// Only queue hand-off failures are transient; authentication and
    /// payload failures will fail identically on every redelivery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::EnqueueFailed(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// - 400: no signature to check
    /// - 401: signature present but wrong
    /// - 422: authenticated but unparseable
    /// - 503: accepted but not queued, provider should retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebhookError::EnqueueFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
