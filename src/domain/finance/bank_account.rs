//! Reserved (virtual) bank account aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BankAccountId, CooperativeId, MemberId, Timestamp, UserId,
};

/// Status of a provider-issued account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountStatus {
    Active,
    Inactive,
}

/// A dedicated virtual account number issued by a payment provider.
///
/// Incoming transfers to this account are reported back by the
/// provider's webhook and matched to the owning member via
/// `account_reference`.
///
/// # Invariants
///
/// - At most one reserved account per member per cooperative
/// - `account_reference` is unique and never changes once issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedBankAccount {
    pub id: BankAccountId,
    pub member_id: MemberId,
    pub cooperative_id: CooperativeId,

    pub account_number: String,
    pub bank_code: String,
    pub bank_name: String,
    pub account_name: String,

    /// Deterministic reference sent to the provider at issuance time;
    /// echoed back in webhook payloads for matching.
    pub account_reference: String,

    /// Provider that issued the account, e.g. `"payaza"`.
    pub provider: String,

    pub status: BankAccountStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReservedBankAccount {
    /// Builds the deterministic account reference for a member.
    ///
    /// The same member always produces the same reference, which is
    /// what makes provider issuance idempotent across retries.
    pub fn build_reference(acronym: &str, user_id: UserId) -> String {
        format!("ref_{}_{}", acronym, user_id)
    }
}
