//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `cooperative` - Cooperative aggregate, status lifecycle, update audit trail
//! - `membership` - Member lifecycle, approval state machine, identifier generation
//! - `finance` - Wallet and reserved bank account entities
//! - `webhook` - Payaza webhook signature verification and event normalization

pub mod cooperative;
pub mod finance;
pub mod foundation;
pub mod membership;
pub mod webhook;
