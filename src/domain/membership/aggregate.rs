//! Member aggregate entity.
//!
//! A Member represents one user's participation in one cooperative.
//! Each (user, cooperative) pair has at most one membership.
//!
//! # Design Decisions
//!
//! - **One per user per cooperative**: Unique constraint on
//!   (user_id, cooperative_id) enforced at the database level; the
//!   application-level pre-check only produces a friendlier error.
//! - **Identifiers on activation**: `membership_id` and `referral_code`
//!   stay `None` until the member first becomes active.
//! - **Money as strings**: deposits are stored as string-encoded decimals
//!   to avoid floating-point error.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CooperativeId, DomainError, ErrorCode, MemberId, StateMachine, Timestamp, UserId,
};

use super::{CooperativeRole, MembershipIdentifiers, MembershipStatus, MembershipType};

/// Someone to contact on the member's behalf in an emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A guarantor vouching for the member's obligations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guarantor {
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Member aggregate - one user's record within one cooperative.
///
/// # Invariants
///
/// - `id` is globally unique
/// - (`user_id`, `cooperative_id`) is unique
/// - `membership_id` and `referral_code` are non-null if and only if the
///   member has ever been active
/// - Status transitions follow the membership state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier for this membership record.
    pub id: MemberId,

    /// User who holds the membership.
    pub user_id: UserId,

    /// Cooperative the membership belongs to.
    pub cooperative_id: CooperativeId,

    /// Human-readable ID, assigned on first activation.
    pub membership_id: Option<String>,

    /// Referral code, assigned on first activation.
    pub referral_code: Option<String>,

    /// Role within the cooperative.
    pub role: CooperativeRole,

    /// Current status in the membership lifecycle.
    pub status: MembershipStatus,

    /// Category of membership held.
    pub membership_type: MembershipType,

    /// Number of cooperative shares owned.
    pub shares_owned: i64,

    /// Cumulative deposits, string-encoded decimal.
    pub total_deposits: String,

    /// Internal credit score.
    pub credit_score: i64,

    /// People to contact in an emergency.
    pub emergency_contacts: Vec<EmergencyContact>,

    /// Guarantors backing this membership.
    pub guarantors: Vec<Guarantor>,

    /// Member who referred this one, if any.
    pub referrer: Option<MemberId>,

    /// Set when the member first becomes active.
    pub date_joined: Option<Timestamp>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl Member {
    /// Creates a new membership awaiting approval.
    ///
    /// New members always start as plain `Member` role in
    /// `PendingApproval`, with no identifiers.
    pub fn new_pending(
        id: MemberId,
        user_id: UserId,
        cooperative_id: CooperativeId,
        membership_type: MembershipType,
        emergency_contacts: Vec<EmergencyContact>,
        guarantors: Vec<Guarantor>,
        referrer: Option<MemberId>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            cooperative_id,
            membership_id: None,
            referral_code: None,
            role: CooperativeRole::Member,
            status: MembershipStatus::PendingApproval,
            membership_type,
            shares_owned: 0,
            total_deposits: "0".to_string(),
            credit_score: 0,
            emergency_contacts,
            guarantors,
            referrer,
            date_joined: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates the founding member of a cooperative, already active.
    ///
    /// Used when a cooperative is registered: the creator becomes the
    /// first member with sequence 1 identifiers and their chosen role.
    pub fn bootstrap(
        id: MemberId,
        user_id: UserId,
        cooperative_id: CooperativeId,
        role: CooperativeRole,
        identifiers: MembershipIdentifiers,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            cooperative_id,
            membership_id: Some(identifiers.membership_id),
            referral_code: Some(identifiers.referral_code),
            role,
            status: MembershipStatus::Active,
            membership_type: MembershipType::Regular,
            shares_owned: 0,
            total_deposits: "0".to_string(),
            credit_score: 0,
            emergency_contacts: Vec::new(),
            guarantors: Vec::new(),
            referrer: None,
            date_joined: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if this member has ever been active.
    ///
    /// Identifiers are assigned exactly once, on first activation, so
    /// their presence is the marker.
    pub fn has_been_active(&self) -> bool {
        self.membership_id.is_some()
    }

    /// Activates the member, assigning identifiers on first activation.
    ///
    /// Identifiers and `date_joined` are only written when absent; a
    /// member reactivated from `Inactive` or `Suspended` keeps the
    /// originals.
    ///
    /// # Errors
    ///
    /// Returns error if the transition into `Active` is not allowed from
    /// the current status.
    pub fn activate(&mut self, identifiers: MembershipIdentifiers) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Active)?;
        if self.membership_id.is_none() {
            self.membership_id = Some(identifiers.membership_id);
            self.referral_code = Some(identifiers.referral_code);
            self.date_joined = Some(Timestamp::now());
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Transitions to a non-active status (inactive, suspended,
    /// terminated).
    ///
    /// # Errors
    ///
    /// Returns error if the transition is not allowed, including any
    /// attempt to re-apply the current status.
    pub fn change_status(&mut self, target: MembershipStatus) -> Result<(), DomainError> {
        self.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn transition_to(&mut self, target: MembershipStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition membership from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}
