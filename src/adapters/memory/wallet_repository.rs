//! In-memory WalletRepository for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::domain::finance::Wallet;
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, WalletId};
use crate::ports::{DepositOutcome, WalletRepository};

/// In-memory implementation of the WalletRepository port.
///
/// Deposit idempotency is mirrored with a set of seen transaction
/// references, matching the unique ledger key used by PostgreSQL.
#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: RwLock<HashMap<WalletId, Wallet>>,
    seen_references: RwLock<HashSet<String>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored wallets (for test assertions).
    pub fn count(&self) -> usize {
        self.wallets
            .read()
            .expect("InMemoryWalletRepository: lock poisoned")
            .len()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn save(&self, wallet: &Wallet) -> Result<(), DomainError> {
        let mut store = self
            .wallets
            .write()
            .expect("InMemoryWalletRepository: lock poisoned");

        if store.values().any(|w| w.member_id == wallet.member_id) {
            return Err(DomainError::new(
                ErrorCode::DuplicateWallet,
                "Member already has a wallet",
            ));
        }

        store.insert(wallet.id, wallet.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, DomainError> {
        Ok(self
            .wallets
            .read()
            .expect("InMemoryWalletRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_member(&self, member_id: &MemberId) -> Result<Option<Wallet>, DomainError> {
        Ok(self
            .wallets
            .read()
            .expect("InMemoryWalletRepository: lock poisoned")
            .values()
            .find(|w| &w.member_id == member_id)
            .cloned())
    }

    async fn apply_deposit(
        &self,
        wallet_id: &WalletId,
        amount: &str,
        transaction_reference: &str,
    ) -> Result<DepositOutcome, DomainError> {
        let mut references = self
            .seen_references
            .write()
            .expect("InMemoryWalletRepository: lock poisoned");

        if references.contains(transaction_reference) {
            return Ok(DepositOutcome::Duplicate);
        }

        let mut store = self
            .wallets
            .write()
            .expect("InMemoryWalletRepository: lock poisoned");

        let wallet = store.get_mut(wallet_id).ok_or_else(|| {
            DomainError::new(ErrorCode::WalletNotFound, "Wallet not found")
        })?;

        wallet.credit(amount).map_err(|e| {
            DomainError::new(ErrorCode::ValidationFailed, e.to_string())
        })?;

        references.insert(transaction_reference.to_string());
        Ok(DepositOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CooperativeId;

    #[tokio::test]
    async fn second_wallet_for_same_member_is_rejected() {
        let repo = InMemoryWalletRepository::new();
        let member_id = MemberId::new();
        let coop_id = CooperativeId::new();

        repo.save(&Wallet::open(member_id, coop_id)).await.unwrap();
        let err = repo.save(&Wallet::open(member_id, coop_id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateWallet);
    }

    #[tokio::test]
    async fn replayed_transaction_reference_credits_once() {
        let repo = InMemoryWalletRepository::new();
        let wallet = Wallet::open(MemberId::new(), CooperativeId::new());
        repo.save(&wallet).await.unwrap();

        let first = repo
            .apply_deposit(&wallet.id, "2500.00", "txn_abc123")
            .await
            .unwrap();
        let replay = repo
            .apply_deposit(&wallet.id, "2500.00", "txn_abc123")
            .await
            .unwrap();

        assert_eq!(first, DepositOutcome::Applied);
        assert_eq!(replay, DepositOutcome::Duplicate);

        let stored = repo.find_by_id(&wallet.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, "2500.00");
    }

    #[tokio::test]
    async fn deposit_to_missing_wallet_fails() {
        let repo = InMemoryWalletRepository::new();
        let err = repo
            .apply_deposit(&WalletId::new(), "100.00", "txn_missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::WalletNotFound);
    }
}
