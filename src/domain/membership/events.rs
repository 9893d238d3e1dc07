//! Membership domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CooperativeId, EventId, MemberId, Timestamp, UserId};
use crate::domain_event;

/// Emitted when a member first becomes active in a cooperative.
///
/// Consumed by the financial account provisioner: wallet and reserved
/// bank account creation happen as an event-driven follow-up so that a
/// provisioning failure never rolls back the activation itself.
///
/// Contact details ride on the event because the provider request needs
/// them and the member record does not store them; they come from the
/// authenticated user context at activation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberActivated {
    pub event_id: EventId,
    pub member_id: MemberId,
    pub user_id: UserId,
    pub cooperative_id: CooperativeId,
    pub membership_id: String,
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub occurred_at: Timestamp,
}

domain_event!(
    MemberActivated,
    event_type = "member.activated",
    aggregate_id = member_id,
    aggregate_type = "Member",
    occurred_at = occurred_at,
    event_id = event_id
);
