//! PostgreSQL implementation of WalletRepository.
//!
//! Deposits use a ledger table (`wallet_deposits`) with a unique
//! transaction reference; the ledger insert and the balance update run
//! in one transaction, which is what makes webhook replays harmless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::finance::Wallet;
use crate::domain::foundation::{
    CooperativeId, DomainError, ErrorCode, MemberId, Timestamp, WalletId,
};
use crate::ports::{DepositOutcome, WalletRepository};

/// PostgreSQL implementation of the WalletRepository port.
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a wallet.
#[derive(Debug, sqlx::FromRow)]
struct WalletRow {
    id: Uuid,
    member_id: Uuid,
    cooperative_id: Uuid,
    balance: String,
    currency_code: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WalletRow> for Wallet {
    fn from(row: WalletRow) -> Self {
        Wallet {
            id: WalletId::from_uuid(row.id),
            member_id: MemberId::from_uuid(row.member_id),
            cooperative_id: CooperativeId::from_uuid(row.cooperative_id),
            balance: row.balance,
            currency_code: row.currency_code,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn save(&self, wallet: &Wallet) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO wallets (
                id, member_id, cooperative_id, balance, currency_code,
                is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(wallet.id.as_uuid())
        .bind(wallet.member_id.as_uuid())
        .bind(wallet.cooperative_id.as_uuid())
        .bind(&wallet.balance)
        .bind(&wallet.currency_code)
        .bind(wallet.is_active)
        .bind(wallet.created_at.as_datetime())
        .bind(wallet.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("wallets_member_id_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateWallet,
                        "Member already has a wallet",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save wallet: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, DomainError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"
            SELECT id, member_id, cooperative_id, balance, currency_code,
                   is_active, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find wallet: {}", e),
            )
        })?;

        Ok(row.map(Wallet::from))
    }

    async fn find_by_member(&self, member_id: &MemberId) -> Result<Option<Wallet>, DomainError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"
            SELECT id, member_id, cooperative_id, balance, currency_code,
                   is_active, created_at, updated_at
            FROM wallets
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find wallet: {}", e),
            )
        })?;

        Ok(row.map(Wallet::from))
    }

    async fn apply_deposit(
        &self,
        wallet_id: &WalletId,
        amount: &str,
        transaction_reference: &str,
    ) -> Result<DepositOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let insert = sqlx::query(
            r#"
            INSERT INTO wallet_deposits (id, wallet_id, amount, transaction_reference, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(wallet_id.as_uuid())
        .bind(amount)
        .bind(transaction_reference)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("wallet_deposits_transaction_reference_key") {
                    tx.rollback().await.ok();
                    return Ok(DepositOutcome::Duplicate);
                }
            }
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record deposit: {}", e),
            ));
        }

        // Balances are two-decimal strings; NUMERIC does the arithmetic
        // so the stored value stays canonical.
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = to_char(balance::numeric + $2::numeric, 'FM999999999999990.00'),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet_id.as_uuid())
        .bind(amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to credit wallet: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            tx.rollback().await.ok();
            return Err(DomainError::new(
                ErrorCode::WalletNotFound,
                "Wallet not found",
            ));
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit deposit: {}", e),
            )
        })?;

        Ok(DepositOutcome::Applied)
    }
}
