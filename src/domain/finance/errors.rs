//! Finance-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, MemberId};

/// Errors from wallet and bank account provisioning or crediting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceError {
    /// Wallet record was not found for the member.
    WalletNotFound { member_id: MemberId },

    /// Bank account record was not found for the member.
    BankAccountNotFound { member_id: MemberId },

    /// A concurrent provisioner already created the wallet.
    DuplicateWallet { member_id: MemberId },

    /// A concurrent provisioner already created the bank account.
    DuplicateBankAccount { member_id: MemberId },

    /// The payment provider rejected or failed the request.
    Provider { provider: String, message: String },

    /// No adapter is registered for the requested provider name.
    UnsupportedProvider { provider: String },

    /// Malformed amount or balance.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error (storage, queue).
    Infrastructure(String),
}

impl FinanceError {
    pub fn wallet_not_found(member_id: MemberId) -> Self {
        FinanceError::WalletNotFound { member_id }
    }

    pub fn bank_account_not_found(member_id: MemberId) -> Self {
        FinanceError::BankAccountNotFound { member_id }
    }

    pub fn duplicate_wallet(member_id: MemberId) -> Self {
        FinanceError::DuplicateWallet { member_id }
    }

    pub fn duplicate_bank_account(member_id: MemberId) -> Self {
        FinanceError::DuplicateBankAccount { member_id }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        FinanceError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_provider(provider: impl Into<String>) -> Self {
        FinanceError::UnsupportedProvider {
            provider: provider.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FinanceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        FinanceError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FinanceError::WalletNotFound { .. } => ErrorCode::WalletNotFound,
            FinanceError::BankAccountNotFound { .. } => ErrorCode::BankAccountNotFound,
            FinanceError::DuplicateWallet { .. } => ErrorCode::DuplicateWallet,
            FinanceError::DuplicateBankAccount { .. } => ErrorCode::DuplicateBankAccount,
            FinanceError::Provider { .. } => ErrorCode::ProviderError,
            FinanceError::UnsupportedProvider { .. } => ErrorCode::UnsupportedProvider,
            FinanceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            FinanceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Duplicate-row errors mean a concurrent run already provisioned
    /// the account; callers treat them as success, not failure.
    pub fn is_already_provisioned(&self) -> bool {
        matches!(
            self,
            FinanceError::DuplicateWallet { .. } | FinanceError::DuplicateBankAccount { .. }
        )
    }
}

impl std::fmt::Display for FinanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinanceError::WalletNotFound { member_id } => {
                write!(f, "[{}] No wallet for member {}", self.code(), member_id)
            }
            FinanceError::BankAccountNotFound { member_id } => {
                write!(
                    f,
                    "[{}] No bank account for member {}",
                    self.code(),
                    member_id
                )
            }
            FinanceError::DuplicateWallet { member_id } => {
                write!(
                    f,
                    "[{}] Wallet already exists for member {}",
                    self.code(),
                    member_id
                )
            }
            FinanceError::DuplicateBankAccount { member_id } => {
                write!(
                    f,
                    "[{}] Bank account already exists for member {}",
                    self.code(),
                    member_id
                )
            }
            FinanceError::Provider { provider, message } => {
                write!(f, "[{}] {} provider error: {}", self.code(), provider, message)
            }
            FinanceError::UnsupportedProvider { provider } => {
                write!(f, "[{}] Unsupported provider '{}'", self.code(), provider)
            }
            FinanceError::ValidationFailed { field, message } => {
                write!(f, "[{}] Invalid {}: {}", self.code(), field, message)
            }
            FinanceError::Infrastructure(message) => {
                write!(f, "[{}] {}", self.code(), message)
            }
        }
    }
}

impl std::error::Error for FinanceError {}

// Handlers match on `DomainError::code` (duplicate wallet, duplicate
// bank account) before falling back to this blanket translation.
impl From<DomainError> for FinanceError {
    fn from(err: DomainError) -> Self {
        FinanceError::Infrastructure(err.message)
    }
}
