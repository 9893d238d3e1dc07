//! Queue envelope for authenticated webhook events.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::Timestamp;

use super::errors::WebhookError;

/// Header carrying the Payaza HMAC signature.
pub const PAYAZA_SIGNATURE_HEADER: &str = "x-payaza-signature";

/// Request headers captured for downstream diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookHeaders {
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
    #[serde(rename = "content-type")]
    pub content_type: Option<String>,
    #[serde(rename = "x-payaza-signature")]
    pub signature: Option<String>,
}

/// An authenticated webhook event, as enqueued for reconciliation.
///
/// Built only after signature verification succeeds, so consumers can
/// trust the payload without re-verifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Provider event id, or `webhook_{unix_ts}` when the payload
    /// carries none. The fallback is not unique across a busy second;
    /// deposit idempotency rests on the transaction reference instead.
    pub event_id: String,

    /// Provider event type, e.g. `payment.successful`.
    pub event_type: String,

    pub received_at: Timestamp,

    /// Always true for enqueued envelopes; kept explicit so replayed
    /// or hand-injected envelopes are distinguishable in the queue.
    pub signature_validated: bool,

    pub headers: WebhookHeaders,

    /// Parsed JSON body.
    pub payload: JsonValue,

    /// Exact bytes that were signature-checked, for audit and replay.
    pub raw_payload: String,
}

impl WebhookEnvelope {
    /// Wraps a signature-verified request body into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidPayload` if the body is not a JSON
    /// object.
    pub fn from_verified_request(
        raw_body: &[u8],
        headers: WebhookHeaders,
        received_at: Timestamp,
    ) -> Result<Self, WebhookError> {
        let payload: JsonValue = serde_json::from_slice(raw_body)
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
        if !payload.is_object() {
            return Err(WebhookError::InvalidPayload(
                "body must be a JSON object".to_string(),
            ));
        }

        // Payaza bodies carry `id` and `event`; normalized names differ
        // so queue consumers never depend on provider key spelling.
        let event_id = payload
            .get("id")
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("webhook_{}", received_at.as_unix_secs()));

        let event_type = payload
            .get("event")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            event_id,
            event_type,
            received_at,
            signature_validated: true,
            headers,
            payload,
            raw_payload: String::from_utf8_lossy(raw_body).into_owned(),
        })
    }
}
