//! UpdateCooperativeHandler - patch cooperative fields with an audit trail.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::cooperative::{Cooperative, CooperativeError, CooperativeStatus};
use crate::domain::foundation::{CooperativeId, ErrorCode, MemberId};
use crate::ports::CooperativeRepository;

/// Command to update a cooperative. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCooperativeCommand {
    pub cooperative_id: CooperativeId,
    /// Member performing the update, recorded in the audit trail.
    pub actor: MemberId,
    pub name: Option<String>,
    pub public_listing: Option<bool>,
    pub onboarding_requirements: Option<JsonValue>,
    pub bye_laws: Option<String>,
    pub status: Option<CooperativeStatus>,
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct UpdateCooperativeResult {
    pub cooperative: Cooperative,
    /// Display names of the fields this update touched.
    pub changed_fields: Vec<String>,
}

/// Handler for cooperative updates.
///
/// Applies the requested field changes, records them in the embedded
/// audit trail, and persists everything in one repository write.
pub struct UpdateCooperativeHandler {
    cooperative_repository: Arc<dyn CooperativeRepository>,
}

impl UpdateCooperativeHandler {
    pub fn new(cooperative_repository: Arc<dyn CooperativeRepository>) -> Self {
        Self {
            cooperative_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateCooperativeCommand,
    ) -> Result<UpdateCooperativeResult, CooperativeError> {
        let mut cooperative = self
            .cooperative_repository
            .find_by_id(&cmd.cooperative_id)
            .await?
            .ok_or_else(|| CooperativeError::not_found(cmd.cooperative_id))?;

        let mut changed_fields = Vec::new();

        if let Some(name) = cmd.name {
            cooperative.name = name;
            changed_fields.push("Name".to_string());
        }
        if let Some(public_listing) = cmd.public_listing {
            cooperative.public_listing = public_listing;
            changed_fields.push("Public Listing".to_string());
        }
        if let Some(requirements) = cmd.onboarding_requirements {
            cooperative.onboarding_requirements = Some(requirements);
            changed_fields.push("Onboarding Requirements".to_string());
        }
        if let Some(bye_laws) = cmd.bye_laws {
            cooperative.bye_laws = Some(bye_laws);
            changed_fields.push("Bye Laws".to_string());
        }
        if let Some(status) = cmd.status {
            cooperative.change_status(status).map_err(|e| {
                CooperativeError::invalid_transition(e.message, format!("{:?}", status))
            })?;
            changed_fields.push("Status".to_string());
        }

        if changed_fields.is_empty() {
            return Ok(UpdateCooperativeResult {
                cooperative,
                changed_fields,
            });
        }

        cooperative.record_update(changed_fields.clone(), cmd.actor);

        if let Err(e) = self.cooperative_repository.update(&cooperative).await {
            if e.code == ErrorCode::CooperativeNotFound {
                return Err(CooperativeError::update_failed(cmd.cooperative_id));
            }
            return Err(e.into());
        }

        Ok(UpdateCooperativeResult {
            cooperative,
            changed_fields,
        })
    }
}
