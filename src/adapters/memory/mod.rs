//! In-memory repository adapters for testing.
//!
//! Each adapter enforces the same uniqueness rules as its PostgreSQL
//! counterpart and reports violations with the same error codes, so
//! handler behavior under conflict can be tested without a database.

mod bank_account_repository;
mod cooperative_repository;
mod member_repository;
mod wallet_repository;

pub use bank_account_repository::InMemoryBankAccountRepository;
pub use cooperative_repository::InMemoryCooperativeRepository;
pub use member_repository::InMemoryMemberRepository;
pub use wallet_repository::InMemoryWalletRepository;
