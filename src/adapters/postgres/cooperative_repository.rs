//! PostgreSQL implementation of CooperativeRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cooperative::{Cooperative, CooperativeStatus};
use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::CooperativeRepository;

/// PostgreSQL implementation of the CooperativeRepository port.
pub struct PostgresCooperativeRepository {
    pool: PgPool,
}

impl PostgresCooperativeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a cooperative.
#[derive(Debug, sqlx::FromRow)]
struct CooperativeRow {
    id: Uuid,
    name: String,
    acronym: String,
    coop_id: String,
    status: String,
    public_listing: bool,
    onboarding_requirements: Option<JsonValue>,
    bye_laws: Option<String>,
    meta: JsonValue,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CooperativeRow> for Cooperative {
    type Error = DomainError;

    fn try_from(row: CooperativeRow) -> Result<Self, Self::Error> {
        Ok(Cooperative {
            id: CooperativeId::from_uuid(row.id),
            name: row.name,
            acronym: row.acronym,
            coop_id: row.coop_id,
            status: parse_status(&row.status)?,
            public_listing: row.public_listing,
            onboarding_requirements: row.onboarding_requirements,
            bye_laws: row.bye_laws,
            meta: row.meta,
            created_by: UserId::from_uuid(row.created_by),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<CooperativeStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(CooperativeStatus::Active),
        "inactive" => Ok(CooperativeStatus::Inactive),
        "deactivated" => Ok(CooperativeStatus::Deactivated),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid cooperative status value: {}", s),
        )),
    }
}

fn status_to_string(status: &CooperativeStatus) -> &'static str {
    match status {
        CooperativeStatus::Active => "active",
        CooperativeStatus::Inactive => "inactive",
        CooperativeStatus::Deactivated => "deactivated",
    }
}

#[async_trait]
impl CooperativeRepository for PostgresCooperativeRepository {
    async fn save(&self, cooperative: &Cooperative) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cooperatives (
                id, name, acronym, coop_id, status, public_listing,
                onboarding_requirements, bye_laws, meta, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(cooperative.id.as_uuid())
        .bind(&cooperative.name)
        .bind(&cooperative.acronym)
        .bind(&cooperative.coop_id)
        .bind(status_to_string(&cooperative.status))
        .bind(cooperative.public_listing)
        .bind(&cooperative.onboarding_requirements)
        .bind(&cooperative.bye_laws)
        .bind(&cooperative.meta)
        .bind(cooperative.created_by.as_uuid())
        .bind(cooperative.created_at.as_datetime())
        .bind(cooperative.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("cooperatives_acronym_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateAcronym,
                        "A cooperative with this acronym already exists",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save cooperative: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, cooperative: &Cooperative) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE cooperatives SET
                name = $2,
                status = $3,
                public_listing = $4,
                onboarding_requirements = $5,
                bye_laws = $6,
                meta = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(cooperative.id.as_uuid())
        .bind(&cooperative.name)
        .bind(status_to_string(&cooperative.status))
        .bind(cooperative.public_listing)
        .bind(&cooperative.onboarding_requirements)
        .bind(&cooperative.bye_laws)
        .bind(&cooperative.meta)
        .bind(cooperative.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update cooperative: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CooperativeNotFound,
                "Cooperative not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CooperativeId) -> Result<Option<Cooperative>, DomainError> {
        let row: Option<CooperativeRow> = sqlx::query_as(
            r#"
            SELECT id, name, acronym, coop_id, status, public_listing,
                   onboarding_requirements, bye_laws, meta, created_by, created_at, updated_at
            FROM cooperatives
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find cooperative: {}", e),
            )
        })?;

        row.map(Cooperative::try_from).transpose()
    }

    async fn find_by_acronym(&self, acronym: &str) -> Result<Option<Cooperative>, DomainError> {
        let row: Option<CooperativeRow> = sqlx::query_as(
            r#"
            SELECT id, name, acronym, coop_id, status, public_listing,
                   onboarding_requirements, bye_laws, meta, created_by, created_at, updated_at
            FROM cooperatives
            WHERE acronym = $1
            "#,
        )
        .bind(acronym)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find cooperative: {}", e),
            )
        })?;

        row.map(Cooperative::try_from).transpose()
    }
}
