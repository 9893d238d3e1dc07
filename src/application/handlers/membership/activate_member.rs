//! ActivateMemberHandler - approve a membership and mint its identifiers.

use std::sync::Arc;

use crate::domain::foundation::{
    CooperativeId, ErrorCode, EventId, MemberId, SerializableDomainEvent, Timestamp,
};
use crate::domain::membership::{
    Member, MemberActivated, MembershipError, MembershipIdentifiers, MembershipStatus,
};
use crate::ports::{
    CooperativeRepository, EventPublisher, MemberRepository, TOPIC_MEMBERSHIP_EVENTS,
};

/// Attempts before giving up on a membership ID that keeps colliding
/// with concurrent activations.
const MAX_IDENTIFIER_ATTEMPTS: u32 = 3;

/// Command to activate a member.
///
/// Contact details come from the authenticated user context; they are
/// forwarded on the activation event for account provisioning and never
/// stored on the member record.
#[derive(Debug, Clone)]
pub struct ActivateMemberCommand {
    pub member_id: MemberId,
    pub cooperative_id: CooperativeId,
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Result of an activation.
#[derive(Debug, Clone)]
pub struct ActivateMemberResult {
    pub member: Member,
    /// False when the member was already active and the call was a
    /// no-op.
    pub first_activation: bool,
}

/// Handler for member activation.
///
/// First activation assigns the per-cooperative-per-year identifiers
/// and publishes `member.activated` for the account provisioner.
/// Activating an already-active member returns the existing record
/// untouched. A membership ID collision from a concurrent activation is
/// retried with a recomputed sequence, a bounded number of times.
pub struct ActivateMemberHandler {
    member_repository: Arc<dyn MemberRepository>,
    cooperative_repository: Arc<dyn CooperativeRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ActivateMemberHandler {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        cooperative_repository: Arc<dyn CooperativeRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            member_repository,
            cooperative_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ActivateMemberCommand,
    ) -> Result<ActivateMemberResult, MembershipError> {
        let member = self
            .member_repository
            .find_by_id(&cmd.member_id)
            .await?
            .filter(|m| m.cooperative_id == cmd.cooperative_id)
            .ok_or_else(|| MembershipError::not_found(cmd.member_id, cmd.cooperative_id))?;

        // Idempotent re-activation: the identifiers were minted on a
        // previous call, hand them back without generating or emitting
        // anything.
        if member.status == MembershipStatus::Active {
            return Ok(ActivateMemberResult {
                member,
                first_activation: false,
            });
        }

        let cooperative = self
            .cooperative_repository
            .find_by_id(&cmd.cooperative_id)
            .await?
            .ok_or_else(|| {
                MembershipError::validation(
                    "cooperative_id",
                    format!("Cooperative {} does not exist", cmd.cooperative_id),
                )
            })?;

        let was_activated_before = member.has_been_active();
        let year = Timestamp::now().year();
        let activated = self
            .activate_with_retry(member, &cooperative.acronym, year)
            .await?;

        let first_activation = !was_activated_before;
        if first_activation {
            self.publish_activated(&activated, &cmd).await?;
        }

        tracing::info!(
            member_id = %activated.id,
            membership_id = ?activated.membership_id,
            first_activation,
            "member activated"
        );

        Ok(ActivateMemberResult {
            member: activated,
            first_activation,
        })
    }

    /// Runs the activate-and-persist loop.
    ///
    /// Each attempt recomputes the activation count, so a collision
    /// caused by a concurrent activation lands on a fresh sequence
    /// number the next time around.
    async fn activate_with_retry(
        &self,
        member: Member,
        acronym: &str,
        year: i32,
    ) -> Result<Member, MembershipError> {
        let mut last_membership_id = String::new();

        for attempt in 1..=MAX_IDENTIFIER_ATTEMPTS {
            let count = self
                .member_repository
                .count_activated_in_year(&member.cooperative_id, year)
                .await?;

            let identifiers = MembershipIdentifiers::generate(acronym, year, count)
                .map_err(|e| MembershipError::validation("acronym", e.to_string()))?;
            last_membership_id = identifiers.membership_id.clone();

            let mut candidate = member.clone();
            candidate.activate(identifiers).map_err(|e| {
                if e.code == ErrorCode::InvalidStateTransition {
                    MembershipError::invalid_transition(
                        format!("{:?}", member.status),
                        format!("{:?}", MembershipStatus::Active),
                    )
                } else {
                    e.into()
                }
            })?;

            match self.member_repository.update(&candidate).await {
                Ok(()) => return Ok(candidate),
                Err(e) if e.code == ErrorCode::Conflict => {
                    tracing::warn!(
                        member_id = %member.id,
                        attempt,
                        "membership identifier collision, retrying with fresh sequence"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(MembershipError::identifier_conflict(last_membership_id))
    }

    async fn publish_activated(
        &self,
        member: &Member,
        cmd: &ActivateMemberCommand,
    ) -> Result<(), MembershipError> {
        let membership_id = member
            .membership_id
            .clone()
            .unwrap_or_default();

        let event = MemberActivated {
            event_id: EventId::new(),
            member_id: member.id,
            user_id: member.user_id,
            cooperative_id: member.cooperative_id,
            membership_id,
            display_name: cmd.display_name.clone(),
            email: cmd.email.clone(),
            phone_number: cmd.phone_number.clone(),
            occurred_at: Timestamp::now(),
        };

        self.event_publisher
            .publish(TOPIC_MEMBERSHIP_EVENTS, event.to_envelope())
            .await?;
        Ok(())
    }
}
