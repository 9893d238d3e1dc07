//! HTTP endpoint for Payaza webhooks.
//!
//! The route does no parsing beyond reading raw bytes: signature
//! verification must run over the exact body the provider signed, so
//! JSON extraction happens after authentication in the application
//! handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::application::handlers::webhook::HandlePayazaWebhookHandler;
use crate::domain::webhook::{WebhookError, WebhookHeaders, PAYAZA_SIGNATURE_HEADER};

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub webhook_handler: Arc<HandlePayazaWebhookHandler>,
}

/// Error body returned to the provider on rejection.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn header_value(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// `POST /webhooks/payaza` - authenticate and enqueue a provider callback.
async fn payaza_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let webhook_headers = WebhookHeaders {
        user_agent: header_value(&headers, header::USER_AGENT),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        signature: header_value(&headers, PAYAZA_SIGNATURE_HEADER),
    };

    match state.webhook_handler.handle(&body, webhook_headers).await {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /health` - liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the webhook router.
pub fn webhook_router(state: WebhookAppState) -> Router {
    Router::new()
        .route("/webhooks/payaza", post(payaza_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventQueue;
    use crate::domain::webhook::{compute_test_signature, PayazaWebhookVerifier};
    use crate::ports::TOPIC_INCOMING_PAYMENTS;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const SECRET: &str = "payaza_test_secret_12345";

    fn app() -> (Arc<InMemoryEventQueue>, Router) {
        let queue = Arc::new(InMemoryEventQueue::new());
        let handler = Arc::new(HandlePayazaWebhookHandler::new(
            PayazaWebhookVerifier::new(SECRET),
            queue.clone(),
        ));
        let router = webhook_router(WebhookAppState {
            webhook_handler: handler,
        });
        (queue, router)
    }

    fn signed_request(body: &str, secret: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhooks/payaza")
            .header("content-type", "application/json")
            .header(
                PAYAZA_SIGNATURE_HEADER,
                compute_test_signature(secret, body.as_bytes()),
            )
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_webhook_returns_200_and_enqueues() {
        let (queue, app) = app();
        let body = r#"{"id":"evt_1","event":"payment.successful","amount":"10.00"}"#;

        let response = app.oneshot(signed_request(body, SECRET)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(queue.events_on_topic(TOPIC_INCOMING_PAYMENTS).len(), 1);
    }

    #[tokio::test]
    async fn missing_signature_returns_400() {
        let (queue, app) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/payaza")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"event":"payment.successful"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(queue.event_count(), 0);
    }

    #[tokio::test]
    async fn wrong_signature_returns_401() {
        let (queue, app) = app();
        let body = r#"{"event":"payment.successful"}"#;

        let response = app
            .oneshot(signed_request(body, "wrong_secret"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(queue.event_count(), 0);
    }

    #[tokio::test]
    async fn non_json_body_returns_422() {
        let (_, app) = app();

        let response = app
            .oneshot(signed_request("definitely not json", SECRET))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (_, app) = app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
