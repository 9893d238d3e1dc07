//! Cooperative-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | DuplicateAcronym | 400 |
//! | InvalidTransition | 400 |
//! | ValidationFailed | 400 |
//! | UpdateFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode};

/// Cooperative-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CooperativeError {
    /// Cooperative record was not found.
    NotFound { cooperative_id: CooperativeId },

    /// Another cooperative already holds this acronym.
    DuplicateAcronym { acronym: String },

    /// Disallowed status change.
    InvalidTransition { current: String, attempted: String },

    /// Malformed registration or update input.
    ValidationFailed { field: String, message: String },

    /// Conditional update matched zero rows.
    UpdateFailed { cooperative_id: CooperativeId },

    /// Infrastructure error (storage, queue).
    Infrastructure(String),
}

impl CooperativeError {
    pub fn not_found(cooperative_id: CooperativeId) -> Self {
        CooperativeError::NotFound { cooperative_id }
    }

    pub fn duplicate_acronym(acronym: impl Into<String>) -> Self {
        CooperativeError::DuplicateAcronym {
            acronym: acronym.into(),
        }
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        CooperativeError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CooperativeError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn update_failed(cooperative_id: CooperativeId) -> Self {
        CooperativeError::UpdateFailed { cooperative_id }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CooperativeError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CooperativeError::NotFound { .. } => ErrorCode::CooperativeNotFound,
            CooperativeError::DuplicateAcronym { .. } => ErrorCode::DuplicateAcronym,
            CooperativeError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            CooperativeError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CooperativeError::UpdateFailed { .. } => ErrorCode::UpdateFailed,
            CooperativeError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            CooperativeError::NotFound { cooperative_id } => {
                format!("Cooperative {} not found", cooperative_id)
            }
            CooperativeError::DuplicateAcronym { acronym } => {
                format!("A cooperative with acronym '{}' already exists", acronym)
            }
            CooperativeError::InvalidTransition { current, attempted } => {
                format!("Cannot move cooperative from {} to {}", current, attempted)
            }
            CooperativeError::ValidationFailed { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            CooperativeError::UpdateFailed { .. } => "Cooperative update failed".to_string(),
            CooperativeError::Infrastructure(_) => "Internal error".to_string(),
        }
    }
}

impl std::fmt::Display for CooperativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for CooperativeError {}

// Handlers match on `DomainError::code` (duplicate acronym, not found)
// before falling back to this blanket translation.
impl From<DomainError> for CooperativeError {
    fn from(err: DomainError) -> Self {
        CooperativeError::Infrastructure(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_acronym_names_the_acronym() {
        let err = CooperativeError::duplicate_acronym("THEOCR");
        assert!(err.message().contains("THEOCR"));
        assert_eq!(err.code(), ErrorCode::DuplicateAcronym);
    }

    #[test]
    fn infrastructure_message_is_generic() {
        let err = CooperativeError::infrastructure("pool exhausted");
        assert_eq!(err.message(), "Internal error");
    }
}
