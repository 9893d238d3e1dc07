//! In-memory BankAccountRepository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::finance::ReservedBankAccount;
use crate::domain::foundation::{BankAccountId, DomainError, ErrorCode, MemberId};
use crate::ports::BankAccountRepository;

/// In-memory implementation of the BankAccountRepository port.
#[derive(Default)]
pub struct InMemoryBankAccountRepository {
    accounts: RwLock<HashMap<BankAccountId, ReservedBankAccount>>,
}

impl InMemoryBankAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored accounts (for test assertions).
    pub fn count(&self) -> usize {
        self.accounts
            .read()
            .expect("InMemoryBankAccountRepository: lock poisoned")
            .len()
    }
}

#[async_trait]
impl BankAccountRepository for InMemoryBankAccountRepository {
    async fn save(&self, account: &ReservedBankAccount) -> Result<(), DomainError> {
        let mut store = self
            .accounts
            .write()
            .expect("InMemoryBankAccountRepository: lock poisoned");

        let duplicate = store.values().any(|a| {
            a.member_id == account.member_id || a.account_reference == account.account_reference
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::DuplicateBankAccount,
                "Member already has a reserved bank account",
            ));
        }

        store.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ReservedBankAccount>, DomainError> {
        Ok(self
            .accounts
            .read()
            .expect("InMemoryBankAccountRepository: lock poisoned")
            .values()
            .find(|a| &a.member_id == member_id)
            .cloned())
    }

    async fn find_by_reference(
        &self,
        account_reference: &str,
    ) -> Result<Option<ReservedBankAccount>, DomainError> {
        Ok(self
            .accounts
            .read()
            .expect("InMemoryBankAccountRepository: lock poisoned")
            .values()
            .find(|a| a.account_reference == account_reference)
            .cloned())
    }
}
