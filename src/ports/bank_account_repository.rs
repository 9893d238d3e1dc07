//! Reserved bank account repository port.

use crate::domain::finance::ReservedBankAccount;
use crate::domain::foundation::{DomainError, MemberId};
use async_trait::async_trait;

/// Repository port for ReservedBankAccount persistence.
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    /// Save a newly issued account.
    ///
    /// # Errors
    ///
    /// - `DuplicateBankAccount` if the member already has an account
    /// - `DatabaseError` on persistence failure
    async fn save(&self, account: &ReservedBankAccount) -> Result<(), DomainError>;

    /// Find a member's reserved account. Returns `None` if not yet issued.
    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ReservedBankAccount>, DomainError>;

    /// Find an account by the reference echoed in webhook payloads.
    ///
    /// This is the reconciliation lookup: an incoming payment names an
    /// `account_reference` and this resolves it to the owning member.
    async fn find_by_reference(
        &self,
        account_reference: &str,
    ) -> Result<Option<ReservedBankAccount>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_account_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BankAccountRepository) {}
    }
}
