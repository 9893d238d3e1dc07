//! PostgreSQL implementation of MemberRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CooperativeId, DomainError, ErrorCode, MemberId, Timestamp, UserId,
};
use crate::domain::membership::{
    CooperativeRole, Member, MembershipStatus, MembershipType,
};
use crate::ports::MemberRepository;

/// PostgreSQL implementation of the MemberRepository port.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a member.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    user_id: Uuid,
    cooperative_id: Uuid,
    membership_id: Option<String>,
    referral_code: Option<String>,
    role: String,
    status: String,
    membership_type: String,
    shares_owned: i64,
    total_deposits: String,
    credit_score: i64,
    emergency_contacts: JsonValue,
    guarantors: JsonValue,
    referrer: Option<Uuid>,
    date_joined: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let emergency_contacts = serde_json::from_value(row.emergency_contacts).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt emergency_contacts: {}", e),
            )
        })?;
        let guarantors = serde_json::from_value(row.guarantors).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Corrupt guarantors: {}", e))
        })?;

        Ok(Member {
            id: MemberId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            membership_id: row.membership_id,
            referral_code: row.referral_code,
            role: parse_role(&row.role)?,
            status: parse_status(&row.status)?,
            membership_type: parse_type(&row.membership_type)?,
            shares_owned: row.shares_owned,
            total_deposits: row.total_deposits,
            credit_score: row.credit_score,
            emergency_contacts,
            guarantors,
            referrer: row.referrer.map(MemberId::from_uuid),
            date_joined: row.date_joined.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<MembershipStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "pending_approval" => Ok(MembershipStatus::PendingApproval),
        "active" => Ok(MembershipStatus::Active),
        "inactive" => Ok(MembershipStatus::Inactive),
        "suspended" => Ok(MembershipStatus::Suspended),
        "terminated" => Ok(MembershipStatus::Terminated),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid membership status value: {}", s),
        )),
    }
}

fn status_to_string(status: &MembershipStatus) -> &'static str {
    match status {
        MembershipStatus::PendingApproval => "pending_approval",
        MembershipStatus::Active => "active",
        MembershipStatus::Inactive => "inactive",
        MembershipStatus::Suspended => "suspended",
        MembershipStatus::Terminated => "terminated",
    }
}

fn parse_role(s: &str) -> Result<CooperativeRole, DomainError> {
    match s.to_lowercase().as_str() {
        "president" => Ok(CooperativeRole::President),
        "secretary" => Ok(CooperativeRole::Secretary),
        "treasurer" => Ok(CooperativeRole::Treasurer),
        "accountant" => Ok(CooperativeRole::Accountant),
        "staff" => Ok(CooperativeRole::Staff),
        "member" => Ok(CooperativeRole::Member),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid role value: {}", s),
        )),
    }
}

fn role_to_string(role: &CooperativeRole) -> &'static str {
    match role {
        CooperativeRole::President => "president",
        CooperativeRole::Secretary => "secretary",
        CooperativeRole::Treasurer => "treasurer",
        CooperativeRole::Accountant => "accountant",
        CooperativeRole::Staff => "staff",
        CooperativeRole::Member => "member",
    }
}

fn parse_type(s: &str) -> Result<MembershipType, DomainError> {
    match s.to_lowercase().as_str() {
        "regular" => Ok(MembershipType::Regular),
        "corporate" => Ok(MembershipType::Corporate),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid membership type value: {}", s),
        )),
    }
}

fn type_to_string(membership_type: &MembershipType) -> &'static str {
    match membership_type {
        MembershipType::Regular => "regular",
        MembershipType::Corporate => "corporate",
    }
}

fn contacts_json(member: &Member) -> Result<(JsonValue, JsonValue), DomainError> {
    let contacts = serde_json::to_value(&member.emergency_contacts).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize emergency contacts: {}", e),
        )
    })?;
    let guarantors = serde_json::to_value(&member.guarantors).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize guarantors: {}", e),
        )
    })?;
    Ok((contacts, guarantors))
}

const SELECT_MEMBER: &str = r#"
    SELECT id, user_id, cooperative_id, membership_id, referral_code, role, status,
           membership_type, shares_owned, total_deposits, credit_score,
           emergency_contacts, guarantors, referrer, date_joined, created_at, updated_at
    FROM members
"#;

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let (contacts, guarantors) = contacts_json(member)?;

        sqlx::query(
            r#"
            INSERT INTO members (
                id, user_id, cooperative_id, membership_id, referral_code, role, status,
                membership_type, shares_owned, total_deposits, credit_score,
                emergency_contacts, guarantors, referrer, date_joined, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(member.user_id.as_uuid())
        .bind(member.cooperative_id.as_uuid())
        .bind(&member.membership_id)
        .bind(&member.referral_code)
        .bind(role_to_string(&member.role))
        .bind(status_to_string(&member.status))
        .bind(type_to_string(&member.membership_type))
        .bind(member.shares_owned)
        .bind(&member.total_deposits)
        .bind(member.credit_score)
        .bind(contacts)
        .bind(guarantors)
        .bind(member.referrer.as_ref().map(|r| r.as_uuid()))
        .bind(member.date_joined.as_ref().map(|d| d.as_datetime()))
        .bind(member.created_at.as_datetime())
        .bind(member.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("members_user_id_cooperative_id_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateMembership,
                        "User already belongs to this cooperative",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save member: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<(), DomainError> {
        let (contacts, guarantors) = contacts_json(member)?;

        let result = sqlx::query(
            r#"
            UPDATE members SET
                membership_id = $2,
                referral_code = $3,
                role = $4,
                status = $5,
                membership_type = $6,
                shares_owned = $7,
                total_deposits = $8,
                credit_score = $9,
                emergency_contacts = $10,
                guarantors = $11,
                referrer = $12,
                date_joined = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(&member.membership_id)
        .bind(&member.referral_code)
        .bind(role_to_string(&member.role))
        .bind(status_to_string(&member.status))
        .bind(type_to_string(&member.membership_type))
        .bind(member.shares_owned)
        .bind(&member.total_deposits)
        .bind(member.credit_score)
        .bind(contacts)
        .bind(guarantors)
        .bind(member.referrer.as_ref().map(|r| r.as_uuid()))
        .bind(member.date_joined.as_ref().map(|d| d.as_datetime()))
        .bind(member.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("members_cooperative_id_membership_id_key") {
                    // Concurrent activation claimed the same sequence
                    // number; callers retry with a fresh count.
                    return DomainError::new(
                        ErrorCode::Conflict,
                        "Membership ID already assigned to another member",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update member: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                "Member not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_MEMBER))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find member: {}", e),
                    )
                })?;

        row.map(Member::try_from).transpose()
    }

    async fn find_by_user_and_cooperative(
        &self,
        user_id: &UserId,
        cooperative_id: &CooperativeId,
    ) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND cooperative_id = $2",
            SELECT_MEMBER
        ))
        .bind(user_id.as_uuid())
        .bind(cooperative_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find member: {}", e),
            )
        })?;

        row.map(Member::try_from).transpose()
    }

    async fn count_activated_in_year(
        &self,
        cooperative_id: &CooperativeId,
        year: i32,
    ) -> Result<u64, DomainError> {
        // The year is the middle segment of the membership ID, written
        // exactly once at first activation.
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM members
            WHERE cooperative_id = $1
              AND membership_id IS NOT NULL
              AND split_part(membership_id, '-', 2) = $2
            "#,
        )
        .bind(cooperative_id.as_uuid())
        .bind(year.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count activated members: {}", e),
            )
        })?;

        Ok(count as u64)
    }
}
