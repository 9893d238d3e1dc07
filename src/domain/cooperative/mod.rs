//! Cooperative domain - the organization entity members join.
//!
//! Owns registration rules (acronym, derived coop ID), the status
//! lifecycle, and the update audit trail embedded in the cooperative's
//! metadata.

mod aggregate;
mod audit_trail;
mod errors;
mod status;

pub use aggregate::Cooperative;
pub use audit_trail::{UpdateTrail, UpdateTrailEntry};
pub use errors::CooperativeError;
pub use status::CooperativeStatus;
