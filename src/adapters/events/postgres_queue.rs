//! PostgreSQL-backed event queue.
//!
//! Events are inserted into the `event_queue` table by the publishing
//! side and drained by the `QueueConsumer`. Rows survive process
//! crashes, which is what makes the webhook ingress safe to return 200
//! before reconciliation has run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventPublisher, QueueSource, QueuedEvent};

/// PostgreSQL implementation of the event queue.
pub struct PostgresEventQueue {
    pool: PgPool,
}

impl PostgresEventQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    id: Uuid,
    topic: String,
    envelope: JsonValue,
    attempts: i32,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl TryFrom<QueueRow> for QueuedEvent {
    type Error = DomainError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let envelope: EventEnvelope = serde_json::from_value(row.envelope).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt queued envelope: {}", e),
            )
        })?;

        Ok(QueuedEvent {
            id: row.id,
            topic: row.topic,
            envelope,
            attempts: row.attempts,
        })
    }
}

#[async_trait]
impl EventPublisher for PostgresEventQueue {
    async fn publish(&self, topic: &str, event: EventEnvelope) -> Result<(), DomainError> {
        let envelope = serde_json::to_value(&event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize envelope: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO event_queue (id, topic, envelope, status, attempts, created_at)
            VALUES ($1, $2, $3, 'pending', 0, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(topic)
        .bind(envelope)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::EnqueueFailed,
                format!("Failed to enqueue event: {}", e),
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl QueueSource for PostgresEventQueue {
    async fn fetch_pending(
        &self,
        topic: &str,
        limit: u32,
    ) -> Result<Vec<QueuedEvent>, DomainError> {
        let rows: Vec<QueueRow> = sqlx::query_as(
            r#"
            SELECT id, topic, envelope, attempts, created_at
            FROM event_queue
            WHERE topic = $1 AND status = 'pending'
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(topic)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch pending events: {}", e),
            )
        })?;

        rows.into_iter().map(QueuedEvent::try_from).collect()
    }

    async fn mark_processed(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_queue
            SET status = 'processed', processed_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark event processed: {}", e),
            )
        })?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_queue
            SET attempts = attempts + 1, last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark event failed: {}", e),
            )
        })?;

        Ok(())
    }
}
