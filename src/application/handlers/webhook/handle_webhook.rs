//! HandlePayazaWebhookHandler - verify, wrap and enqueue provider webhooks.
//!
//! The ingress does the minimum work needed to answer the provider
//! quickly: check the signature over the raw bytes, wrap the body in an
//! envelope and hand it to the queue. All reconciliation happens in the
//! payment consumer, off the request path.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{EventEnvelope, EventId, Timestamp};
use crate::domain::webhook::{
    PayazaWebhookVerifier, WebhookEnvelope, WebhookError, WebhookHeaders,
};
use crate::ports::{EventPublisher, TOPIC_INCOMING_PAYMENTS};

/// Acknowledgement body returned to the provider on receipt.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub status: String,
    pub message: String,
    pub timestamp: u64,
}

/// Handler for the Payaza webhook endpoint.
pub struct HandlePayazaWebhookHandler {
    verifier: PayazaWebhookVerifier,
    publisher: Arc<dyn EventPublisher>,
}

impl HandlePayazaWebhookHandler {
    pub fn new(verifier: PayazaWebhookVerifier, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            verifier,
            publisher,
        }
    }

    /// Authenticates a webhook request and enqueues it for reconciliation.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` when the signature header is absent
    /// - `InvalidSignature` when verification fails
    /// - `InvalidPayload` when the body is not a JSON object
    /// - `EnqueueFailed` when the queue rejects the envelope
    pub async fn handle(
        &self,
        raw_body: &[u8],
        headers: WebhookHeaders,
    ) -> Result<WebhookAck, WebhookError> {
        let signature = headers
            .signature
            .as_deref()
            .ok_or(WebhookError::MissingSignature)?;

        if let Err(e) = self.verifier.verify(raw_body, signature) {
            tracing::warn!(
                user_agent = headers.user_agent.as_deref().unwrap_or("unknown"),
                "webhook signature verification failed"
            );
            return Err(e);
        }

        let received_at = Timestamp::now();
        let envelope = WebhookEnvelope::from_verified_request(raw_body, headers, received_at)?;

        let event = EventEnvelope::from_external(
            EventId::from_string(&envelope.event_id),
            &envelope.event_type,
            serde_json::to_value(&envelope)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?,
        );

        self.publisher
            .publish(TOPIC_INCOMING_PAYMENTS, event)
            .await
            .map_err(|e| WebhookError::EnqueueFailed(e.message))?;

        tracing::info!(
            event_id = %envelope.event_id,
            event_type = %envelope.event_type,
            "webhook authenticated and enqueued"
        );

        Ok(WebhookAck {
            status: "received".to_string(),
            message: format!("Event {} accepted for processing", envelope.event_id),
            timestamp: received_at.as_unix_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventQueue;
    use crate::domain::webhook::compute_test_signature;
    use serde_json::json;

    const SECRET: &str = "payaza_test_secret_12345";

    fn handler() -> (Arc<InMemoryEventQueue>, HandlePayazaWebhookHandler) {
        let queue = Arc::new(InMemoryEventQueue::new());
        let handler =
            HandlePayazaWebhookHandler::new(PayazaWebhookVerifier::new(SECRET), queue.clone());
        (queue, handler)
    }

    fn signed_headers(body: &[u8]) -> WebhookHeaders {
        WebhookHeaders {
            user_agent: Some("Payaza-Hookshot".to_string()),
            content_type: Some("application/json".to_string()),
            signature: Some(compute_test_signature(SECRET, body)),
        }
    }

    fn payment_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_123",
            "event": "payment.successful",
            "account_reference": "ref_THEOCR_user",
            "transaction_reference": "txn_001",
            "amount": "150.00",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn valid_webhook_is_acknowledged_and_enqueued() {
        let (queue, handler) = handler();
        let body = payment_body();

        let ack = handler.handle(&body, signed_headers(&body)).await.unwrap();

        assert_eq!(ack.status, "received");
        assert!(ack.message.contains("evt_123"));

        let published = queue.events_on_topic(TOPIC_INCOMING_PAYMENTS);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event_type, "payment.successful");
        assert_eq!(
            published[0].payload["payload"]["transaction_reference"],
            "txn_001"
        );
        assert_eq!(published[0].payload["signature_validated"], true);
    }

    #[tokio::test]
    async fn missing_signature_is_rejected_without_enqueue() {
        let (queue, handler) = handler();
        let body = payment_body();
        let headers = WebhookHeaders {
            signature: None,
            ..signed_headers(&body)
        };

        let err = handler.handle(&body, headers).await.unwrap_err();

        assert!(matches!(err, WebhookError::MissingSignature));
        assert_eq!(queue.event_count(), 0);
    }

    #[tokio::test]
    async fn wrong_signature_is_rejected_without_enqueue() {
        let (queue, handler) = handler();
        let body = payment_body();
        let headers = WebhookHeaders {
            signature: Some(compute_test_signature("other_secret", &body)),
            ..signed_headers(&body)
        };

        let err = handler.handle(&body, headers).await.unwrap_err();

        assert!(matches!(err, WebhookError::InvalidSignature));
        assert_eq!(queue.event_count(), 0);
    }

    #[tokio::test]
    async fn authenticated_garbage_body_is_unprocessable() {
        let (queue, handler) = handler();
        let body = b"not json at all";

        let err = handler
            .handle(body, signed_headers(body))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::InvalidPayload(_)));
        assert_eq!(queue.event_count(), 0);
    }
}
