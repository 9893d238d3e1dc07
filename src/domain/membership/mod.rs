//! Membership domain - a user's participation in one cooperative.
//!
//! Covers the approval state machine, the per-cooperative-per-year
//! identifier generator, and the member aggregate whose activation
//! triggers financial account provisioning.

mod aggregate;
mod errors;
mod events;
mod identifier;
mod role;
mod status;

pub use aggregate::{EmergencyContact, Guarantor, Member};
pub use errors::MembershipError;
pub use events::MemberActivated;
pub use identifier::MembershipIdentifiers;
pub use role::{CooperativeRole, MembershipType};
pub use status::MembershipStatus;
