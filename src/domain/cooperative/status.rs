//! Cooperative status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooperativeStatus {
    /// Fully onboarded and operating.
    Active,

    /// Registered but not yet operating (needs subscription/contact).
    /// This is the initial state on registration.
    Inactive,

    /// The cooperative chose to leave the platform.
    Deactivated,
}

impl StateMachine for CooperativeStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CooperativeStatus::*;
        matches!(
            (self, target),
            (Inactive, Active)
                | (Active, Inactive)
                | (Active, Deactivated)
                | (Inactive, Deactivated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CooperativeStatus::*;
        match self {
            Active => vec![Inactive, Deactivated],
            Inactive => vec![Active, Deactivated],
            Deactivated => vec![],
        }
    }
}
