//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types, the state machine
//! trait, and the event envelope that form the vocabulary of the
//! Coop Connect domain.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{BankAccountId, CooperativeId, MemberId, UserId, WalletId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
