//! Wallet repository port.

use crate::domain::finance::Wallet;
use crate::domain::foundation::{DomainError, MemberId, WalletId};
use async_trait::async_trait;

/// Outcome of applying a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// The deposit was recorded and the balance credited.
    Applied,

    /// A deposit with this transaction reference was already applied;
    /// the balance is unchanged.
    Duplicate,
}

/// Repository port for Wallet persistence.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Save a new wallet.
    ///
    /// # Errors
    ///
    /// - `DuplicateWallet` if the member already has a wallet
    /// - `DatabaseError` on persistence failure
    async fn save(&self, wallet: &Wallet) -> Result<(), DomainError>;

    /// Find a wallet by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, DomainError>;

    /// Find a member's wallet. Returns `None` if not yet provisioned.
    async fn find_by_member(&self, member_id: &MemberId) -> Result<Option<Wallet>, DomainError>;

    /// Atomically record a deposit and credit the wallet balance.
    ///
    /// The deposit record and the balance update land in one
    /// transaction, keyed by the provider's transaction reference.
    /// Replayed webhooks hit the unique key and come back as
    /// [`DepositOutcome::Duplicate`] without touching the balance.
    ///
    /// # Errors
    ///
    /// - `WalletNotFound` if the wallet doesn't exist
    /// - `ValidationFailed` if the amount is not a valid decimal
    /// - `DatabaseError` on persistence failure
    async fn apply_deposit(
        &self,
        wallet_id: &WalletId,
        amount: &str,
        transaction_reference: &str,
    ) -> Result<DepositOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WalletRepository) {}
    }
}
