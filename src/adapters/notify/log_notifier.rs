//! Log-only Notifier.
//!
//! Stands in for email/SMS delivery; records what would have been sent
//! so provisioning flows stay observable without an outbound channel.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{Notification, Notifier};

/// Notifier that writes notifications to the log.
#[derive(Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        tracing::info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "notification dispatched"
        );
        tracing::debug!(body = %notification.body, "notification body");
        Ok(())
    }
}
