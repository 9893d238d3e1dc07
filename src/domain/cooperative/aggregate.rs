//! Cooperative aggregate entity.
//!
//! A cooperative is registered once by an authorized user, carries a
//! unique acronym (its business key), and is never physically deleted in
//! normal operation; leaving the platform is a status transition.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::foundation::{
    CooperativeId, DomainError, ErrorCode, MemberId, StateMachine, Timestamp, UserId,
    ValidationError,
};

use super::{CooperativeStatus, UpdateTrail};

/// Minimum length of a cooperative acronym.
const MIN_ACRONYM_LEN: usize = 6;

/// Cooperative aggregate.
///
/// # Invariants
///
/// - `acronym` is unique across the platform and at least 6 characters
/// - `coop_id` is derived once at registration and never changes
/// - Status transitions follow the cooperative state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooperative {
    /// Unique identifier.
    pub id: CooperativeId,

    /// Display name.
    pub name: String,

    /// Business key; unique, at least 6 characters.
    pub acronym: String,

    /// Derived human-readable ID (`COOP-{HANDLE}-{suffix}`).
    pub coop_id: String,

    /// Lifecycle status. Registration starts Inactive.
    pub status: CooperativeStatus,

    /// Whether the cooperative appears in public listings.
    pub public_listing: bool,

    /// Structured onboarding form definition, if configured.
    pub onboarding_requirements: Option<JsonValue>,

    /// Link or text of the cooperative's bye-laws.
    pub bye_laws: Option<String>,

    /// Open metadata map; holds the update audit trail.
    pub meta: JsonValue,

    /// User who registered the cooperative.
    pub created_by: UserId,

    /// When the cooperative was registered.
    pub created_at: Timestamp,

    /// When the cooperative was last updated.
    pub updated_at: Timestamp,
}

impl Cooperative {
    /// Registers a new cooperative.
    ///
    /// Derives `coop_id` from the acronym handle plus a random suffix
    /// and starts the cooperative in `Inactive`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the acronym is shorter than 6
    /// characters after trimming.
    pub fn register(
        id: CooperativeId,
        name: impl Into<String>,
        acronym: impl Into<String>,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        let acronym = acronym.into().trim().to_string();
        if acronym.len() < MIN_ACRONYM_LEN {
            return Err(ValidationError::too_short(
                "acronym",
                MIN_ACRONYM_LEN,
                acronym.len(),
            ));
        }

        let coop_id = derive_coop_id(&acronym);
        let now = Timestamp::now();

        Ok(Self {
            id,
            name: name.into(),
            acronym,
            coop_id,
            status: CooperativeStatus::Inactive,
            public_listing: false,
            onboarding_requirements: None,
            bye_laws: None,
            meta: JsonValue::Object(serde_json::Map::new()),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Transitions the cooperative's status.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is not allowed.
    pub fn change_status(&mut self, target: CooperativeStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition cooperative from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records an update in the embedded audit trail.
    ///
    /// The trail write rides along with whatever field changes the
    /// caller has applied; both land in a single persistence operation.
    pub fn record_update(&mut self, changed_fields: Vec<String>, actor: MemberId) {
        UpdateTrail::record(&mut self.meta, changed_fields, actor, Timestamp::now());
        self.updated_at = Timestamp::now();
    }

    /// Returns the audit trail, newest entry first.
    pub fn update_trail(&self) -> UpdateTrail {
        UpdateTrail::from_meta(&self.meta)
    }
}

/// Derives the human-readable cooperative ID.
///
/// First six characters of the uppercased acronym (spaces replaced with
/// hyphens) plus a 10-char random suffix from a hyphen-stripped UUIDv4.
fn derive_coop_id(acronym: &str) -> String {
    let handle: String = acronym
        .to_uppercase()
        .chars()
        .take(MIN_ACRONYM_LEN)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(10).collect();
    format!("COOP-{}-{}", handle, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cooperative() -> Cooperative {
        Cooperative::register(CooperativeId::new(), "Theocraft", "THEOCR", UserId::new()).unwrap()
    }

    #[test]
    fn register_starts_inactive() {
        let coop = cooperative();
        assert_eq!(coop.status, CooperativeStatus::Inactive);
        assert!(!coop.public_listing);
        assert!(coop.update_trail().is_empty());
    }

    #[test]
    fn register_derives_coop_id_from_acronym() {
        let coop = cooperative();
        assert!(coop.coop_id.starts_with("COOP-THEOCR-"));
        assert_eq!(coop.coop_id.len(), "COOP-THEOCR-".len() + 10);
    }

    #[test]
    fn register_rejects_short_acronym() {
        let result = Cooperative::register(CooperativeId::new(), "Tiny", "TC", UserId::new());
        assert!(result.is_err());
    }

    #[test]
    fn register_trims_acronym_before_validating() {
        let result = Cooperative::register(CooperativeId::new(), "Tiny", "  ABC  ", UserId::new());
        assert!(result.is_err());
    }

    #[test]
    fn status_can_move_inactive_to_active() {
        let mut coop = cooperative();
        coop.change_status(CooperativeStatus::Active).unwrap();
        assert_eq!(coop.status, CooperativeStatus::Active);
    }

    #[test]
    fn deactivated_cooperative_cannot_reactivate() {
        let mut coop = cooperative();
        coop.change_status(CooperativeStatus::Deactivated).unwrap();
        assert!(coop.change_status(CooperativeStatus::Active).is_err());
    }

    #[test]
    fn record_update_appends_to_trail() {
        let mut coop = cooperative();
        let actor = MemberId::new();

        coop.record_update(vec!["Public Listing".into()], actor);
        coop.record_update(vec!["Name".into()], actor);

        let trail = coop.update_trail();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.entries()[0].values, vec!["Name"]);
    }

    #[test]
    fn distinct_registrations_get_distinct_coop_ids() {
        let a = cooperative();
        let b = cooperative();
        assert_ne!(a.coop_id, b.coop_id);
    }
}
