//! Notifier port - member-facing notifications.
//!
//! Notification delivery is fire-and-forget from the caller's point of
//! view; a failed send is logged by the adapter and never fails the
//! originating operation.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// A notification addressed to a platform user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: UserId,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(recipient: UserId, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Port for delivering notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}
