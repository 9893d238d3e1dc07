//! CreateMemberHandler - a user applies to join a cooperative.

use std::sync::Arc;

use crate::domain::foundation::{CooperativeId, ErrorCode, MemberId, UserId};
use crate::domain::membership::{
    EmergencyContact, Guarantor, Member, MembershipError, MembershipType,
};
use crate::ports::{CooperativeRepository, MemberRepository};

/// Command to create a pending membership.
#[derive(Debug, Clone)]
pub struct CreateMemberCommand {
    pub user_id: UserId,
    pub cooperative_id: CooperativeId,
    pub membership_type: MembershipType,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub guarantors: Vec<Guarantor>,
    pub referrer: Option<MemberId>,
}

/// Result of a successful membership application.
#[derive(Debug, Clone)]
pub struct CreateMemberResult {
    pub member: Member,
}

/// Handler for membership applications.
///
/// New members start in PendingApproval with the plain Member role; no
/// identifiers exist until first activation. The duplicate pre-check
/// produces a friendlier error, but the storage unique constraint on
/// (user, cooperative) is the actual guard.
pub struct CreateMemberHandler {
    member_repository: Arc<dyn MemberRepository>,
    cooperative_repository: Arc<dyn CooperativeRepository>,
}

impl CreateMemberHandler {
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        cooperative_repository: Arc<dyn CooperativeRepository>,
    ) -> Self {
        Self {
            member_repository,
            cooperative_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateMemberCommand,
    ) -> Result<CreateMemberResult, MembershipError> {
        self.cooperative_repository
            .find_by_id(&cmd.cooperative_id)
            .await?
            .ok_or_else(|| {
                MembershipError::validation(
                    "cooperative_id",
                    format!("Cooperative {} does not exist", cmd.cooperative_id),
                )
            })?;

        if self
            .member_repository
            .find_by_user_and_cooperative(&cmd.user_id, &cmd.cooperative_id)
            .await?
            .is_some()
        {
            return Err(MembershipError::duplicate(cmd.user_id, cmd.cooperative_id));
        }

        let member = Member::new_pending(
            MemberId::new(),
            cmd.user_id,
            cmd.cooperative_id,
            cmd.membership_type,
            cmd.emergency_contacts,
            cmd.guarantors,
            cmd.referrer,
        );

        if let Err(e) = self.member_repository.save(&member).await {
            // A concurrent application slipped past the pre-check.
            if e.code == ErrorCode::DuplicateMembership {
                return Err(MembershipError::duplicate(
                    member.user_id,
                    member.cooperative_id,
                ));
            }
            return Err(e.into());
        }

        tracing::info!(
            member_id = %member.id,
            cooperative_id = %member.cooperative_id,
            "membership application created"
        );

        Ok(CreateMemberResult { member })
    }
}
