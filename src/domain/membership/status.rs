//! Membership status state machine.
//!
//! Defines all possible membership states within a cooperative and the
//! transitions the approval workflow may perform.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Membership status within a cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Initial state. Awaiting approval by a cooperative officer.
    /// No membership identifier or financial accounts yet.
    PendingApproval,

    /// Approved member with full participation rights.
    Active,

    /// Member stepped back voluntarily. Can be reactivated.
    Inactive,

    /// Member suspended by the cooperative. Can be reactivated.
    Suspended,

    /// Membership ended permanently. No way back.
    Terminated,
}

impl MembershipStatus {
    /// Returns true if this status counts toward the active member
    /// sequence used by identifier generation.
    pub fn is_active(&self) -> bool {
        matches!(self, MembershipStatus::Active)
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            // From PENDING_APPROVAL
            (PendingApproval, Active)
                | (PendingApproval, Terminated)
            // From ACTIVE
                | (Active, Inactive)
                | (Active, Suspended)
                | (Active, Terminated)
            // From INACTIVE
                | (Inactive, Active)
                | (Inactive, Terminated)
            // From SUSPENDED
                | (Suspended, Active)
                | (Suspended, Terminated)
            // TERMINATED is final
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            PendingApproval => vec![Active, Terminated],
            Active => vec![Inactive, Suspended, Terminated],
            Inactive => vec![Active, Terminated],
            Suspended => vec![Active, Terminated],
            Terminated => vec![],
        }
    }
}
