//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CooperativeRepository` - Cooperative aggregate persistence
//! - `MemberRepository` - Member aggregate persistence and activation counts
//! - `WalletRepository` - Wallet persistence and idempotent deposits
//! - `BankAccountRepository` - Reserved bank account persistence
//!
//! ## Integration Ports
//!
//! - `VirtualAccountProvider` - Payment provider account issuance
//! - `ProviderRegistry` - Name-keyed lookup of provider adapters
//! - `EventPublisher` - Topic-based domain event publishing
//! - `Notifier` - Member-facing notifications

mod bank_account_repository;
mod cooperative_repository;
mod event_publisher;
mod member_repository;
mod notifier;
mod virtual_account_provider;
mod wallet_repository;

pub use bank_account_repository::BankAccountRepository;
pub use cooperative_repository::CooperativeRepository;
pub use event_publisher::{
    EventHandler, EventPublisher, QueueSource, QueuedEvent, TOPIC_INCOMING_PAYMENTS,
    TOPIC_MEMBERSHIP_EVENTS,
};
pub use member_repository::MemberRepository;
pub use notifier::{Notification, Notifier};
pub use virtual_account_provider::{
    IssuedAccount, ProviderRegistry, VirtualAccountProvider, VirtualAccountRequest,
};
pub use wallet_repository::{DepositOutcome, WalletRepository};
