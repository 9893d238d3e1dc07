//! PostgreSQL implementation of BankAccountRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::finance::{BankAccountStatus, ReservedBankAccount};
use crate::domain::foundation::{
    BankAccountId, CooperativeId, DomainError, ErrorCode, MemberId, Timestamp,
};
use crate::ports::BankAccountRepository;

/// PostgreSQL implementation of the BankAccountRepository port.
pub struct PostgresBankAccountRepository {
    pool: PgPool,
}

impl PostgresBankAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a reserved bank account.
#[derive(Debug, sqlx::FromRow)]
struct BankAccountRow {
    id: Uuid,
    member_id: Uuid,
    cooperative_id: Uuid,
    account_number: String,
    bank_code: String,
    bank_name: String,
    account_name: String,
    account_reference: String,
    provider: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BankAccountRow> for ReservedBankAccount {
    type Error = DomainError;

    fn try_from(row: BankAccountRow) -> Result<Self, Self::Error> {
        Ok(ReservedBankAccount {
            id: BankAccountId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            account_number: row.account_number,
            bank_code: row.bank_code,
            bank_name: row.bank_name,
            account_name: row.account_name,
            account_reference: row.account_reference,
            provider: row.provider,
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<BankAccountStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(BankAccountStatus::Active),
        "inactive" => Ok(BankAccountStatus::Inactive),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid bank account status value: {}", s),
        )),
    }
}

fn status_to_string(status: &BankAccountStatus) -> &'static str {
    match status {
        BankAccountStatus::Active => "active",
        BankAccountStatus::Inactive => "inactive",
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, member_id, cooperative_id, account_number, bank_code, bank_name,
           account_name, account_reference, provider, status, created_at, updated_at
    FROM bank_accounts
"#;

#[async_trait]
impl BankAccountRepository for PostgresBankAccountRepository {
    async fn save(&self, account: &ReservedBankAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bank_accounts (
                id, member_id, cooperative_id, account_number, bank_code, bank_name,
                account_name, account_reference, provider, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.member_id.as_uuid())
        .bind(account.cooperative_id.as_uuid())
        .bind(&account.account_number)
        .bind(&account.bank_code)
        .bind(&account.bank_name)
        .bind(&account.account_name)
        .bind(&account.account_reference)
        .bind(&account.provider)
        .bind(status_to_string(&account.status))
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("bank_accounts_member_id_key")
                    || db_err.constraint() == Some("bank_accounts_account_reference_key")
                {
                    return DomainError::new(
                        ErrorCode::DuplicateBankAccount,
                        "Member already has a reserved bank account",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save bank account: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ReservedBankAccount>, DomainError> {
        let row: Option<BankAccountRow> =
            sqlx::query_as(&format!("{} WHERE member_id = $1", SELECT_ACCOUNT))
                .bind(member_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find bank account: {}", e),
                    )
                })?;

        row.map(ReservedBankAccount::try_from).transpose()
    }

    async fn find_by_reference(
        &self,
        account_reference: &str,
    ) -> Result<Option<ReservedBankAccount>, DomainError> {
        let row: Option<BankAccountRow> =
            sqlx::query_as(&format!("{} WHERE account_reference = $1", SELECT_ACCOUNT))
                .bind(account_reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find bank account: {}", e),
                    )
                })?;

        row.map(ReservedBankAccount::try_from).transpose()
    }
}
