//! CreateCooperativeHandler - registers a cooperative with its founding member.

use std::sync::Arc;

use crate::domain::cooperative::{Cooperative, CooperativeError};
use crate::domain::foundation::{CooperativeId, ErrorCode, MemberId, Timestamp, UserId};
use crate::domain::membership::{CooperativeRole, Member, MembershipIdentifiers};
use crate::ports::{CooperativeRepository, MemberRepository};

/// Command to register a new cooperative.
#[derive(Debug, Clone)]
pub struct CreateCooperativeCommand {
    pub name: String,
    pub acronym: String,
    pub created_by: UserId,
    /// Role the creator takes in the new cooperative.
    pub creator_role: CooperativeRole,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct CreateCooperativeResult {
    pub cooperative: Cooperative,
    /// The creator's membership, already active with sequence 1
    /// identifiers.
    pub root_member: Member,
}

/// Handler for cooperative registration.
///
/// Registration creates two records: the cooperative itself (Inactive
/// until reviewed) and the creator's membership, bootstrapped straight
/// to Active so the cooperative is never ownerless.
pub struct CreateCooperativeHandler {
    cooperative_repository: Arc<dyn CooperativeRepository>,
    member_repository: Arc<dyn MemberRepository>,
}

impl CreateCooperativeHandler {
    pub fn new(
        cooperative_repository: Arc<dyn CooperativeRepository>,
        member_repository: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            cooperative_repository,
            member_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCooperativeCommand,
    ) -> Result<CreateCooperativeResult, CooperativeError> {
        let cooperative = Cooperative::register(
            CooperativeId::new(),
            cmd.name,
            &cmd.acronym,
            cmd.created_by,
        )
        .map_err(|e| CooperativeError::validation("acronym", e.to_string()))?;

        if let Err(e) = self.cooperative_repository.save(&cooperative).await {
            if e.code == ErrorCode::DuplicateAcronym {
                return Err(CooperativeError::duplicate_acronym(&cooperative.acronym));
            }
            return Err(e.into());
        }

        // The cooperative has no members yet, so the creator always
        // takes sequence 1 for the current year.
        let identifiers =
            MembershipIdentifiers::generate(&cooperative.acronym, Timestamp::now().year(), 0)
                .map_err(|e| CooperativeError::validation("acronym", e.to_string()))?;

        let root_member = Member::bootstrap(
            MemberId::new(),
            cmd.created_by,
            cooperative.id,
            cmd.creator_role,
            identifiers,
        );
        self.member_repository.save(&root_member).await?;

        tracing::info!(
            cooperative_id = %cooperative.id,
            coop_id = %cooperative.coop_id,
            root_membership_id = ?root_member.membership_id,
            "cooperative registered"
        );

        Ok(CreateCooperativeResult {
            cooperative,
            root_member,
        })
    }
}
