//! PostgreSQL adapters.

mod bank_account_repository;
mod cooperative_repository;
mod member_repository;
mod wallet_repository;

pub use bank_account_repository::PostgresBankAccountRepository;
pub use cooperative_repository::PostgresCooperativeRepository;
pub use member_repository::PostgresMemberRepository;
pub use wallet_repository::PostgresWalletRepository;
