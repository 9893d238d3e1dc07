//! Membership-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | DuplicateMembership | 400 |
//! | InvalidTransition | 400 |
//! | IdentifierConflict | 409 |
//! | ValidationFailed | 400 |
//! | UpdateFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode, MemberId, UserId};

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Member record was not found in the cooperative.
    NotFound {
        member_id: MemberId,
        cooperative_id: CooperativeId,
    },

    /// The user already holds a membership in this cooperative,
    /// regardless of that membership's status.
    DuplicateMembership {
        user_id: UserId,
        cooperative_id: CooperativeId,
    },

    /// Disallowed status change.
    InvalidTransition { current: String, attempted: String },

    /// Identifier generation kept colliding with concurrent activations
    /// after the bounded retry budget.
    IdentifierConflict { membership_id: String },

    /// Malformed input to identifier generation or a transition.
    ValidationFailed { field: String, message: String },

    /// Conditional update matched zero rows.
    UpdateFailed { member_id: MemberId },

    /// Infrastructure error (storage, queue).
    Infrastructure(String),
}

impl MembershipError {
    pub fn not_found(member_id: MemberId, cooperative_id: CooperativeId) -> Self {
        MembershipError::NotFound {
            member_id,
            cooperative_id,
        }
    }

    pub fn duplicate(user_id: UserId, cooperative_id: CooperativeId) -> Self {
        MembershipError::DuplicateMembership {
            user_id,
            cooperative_id,
        }
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn identifier_conflict(membership_id: impl Into<String>) -> Self {
        MembershipError::IdentifierConflict {
            membership_id: membership_id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn update_failed(member_id: MemberId) -> Self {
        MembershipError::UpdateFailed { member_id }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound { .. } => ErrorCode::MemberNotFound,
            MembershipError::DuplicateMembership { .. } => ErrorCode::DuplicateMembership,
            MembershipError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::IdentifierConflict { .. } => ErrorCode::Conflict,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::UpdateFailed { .. } => ErrorCode::UpdateFailed,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    ///
    /// Identifier conflicts and infrastructure failures are reported
    /// generically; the underlying cause is logged at the point of
    /// translation, not echoed to callers.
    pub fn message(&self) -> String {
        match self {
            MembershipError::NotFound { cooperative_id, .. } => {
                format!("Member not found for cooperative {}", cooperative_id)
            }
            MembershipError::DuplicateMembership { .. } => {
                "This user is already a member of this cooperative".to_string()
            }
            MembershipError::InvalidTransition { current, attempted } => {
                format!("Cannot move membership from {} to {}", current, attempted)
            }
            MembershipError::IdentifierConflict { .. } => {
                "Membership could not be activated, please retry".to_string()
            }
            MembershipError::ValidationFailed { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            MembershipError::UpdateFailed { .. } => {
                "Cooperative member profile update failed".to_string()
            }
            MembershipError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for MembershipError {}

// Handlers that care about a specific code (duplicate membership,
// identifier conflict) match on `DomainError::code` before falling back
// to this blanket translation.
impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        MembershipError::Infrastructure(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_membership_message_is_user_facing() {
        let err = MembershipError::duplicate(UserId::new(), CooperativeId::new());
        assert_eq!(
            err.message(),
            "This user is already a member of this cooperative"
        );
        assert_eq!(err.code(), ErrorCode::DuplicateMembership);
    }

    #[test]
    fn identifier_conflict_hides_internal_detail() {
        let err = MembershipError::identifier_conflict("THEO-2025-3");
        assert!(!err.message().contains("THEO-2025-3"));
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn display_includes_code() {
        let err = MembershipError::update_failed(MemberId::new());
        assert!(format!("{}", err).starts_with("[UPDATE_FAILED]"));
    }
}
