//! Finance domain - wallets and reserved bank accounts.
//!
//! A member gets at most one wallet and one reserved (virtual) bank
//! account per cooperative, provisioned after first activation. The
//! bank account is issued by an external payment provider; the wallet
//! is platform-internal and credited by reconciled webhook deposits.

mod bank_account;
mod errors;
mod wallet;

pub use bank_account::{BankAccountStatus, ReservedBankAccount};
pub use errors::FinanceError;
pub use wallet::Wallet;
