//! UpdateMemberHandler - patch a member's profile and standing.

use std::sync::Arc;

use crate::domain::foundation::{CooperativeId, ErrorCode, MemberId};
use crate::domain::membership::{
    CooperativeRole, EmergencyContact, Guarantor, Member, MembershipError, MembershipStatus,
    MembershipType,
};
use crate::ports::MemberRepository;

/// Command to update a member. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberCommand {
    pub member_id: MemberId,
    pub cooperative_id: CooperativeId,
    pub role: Option<CooperativeRole>,
    pub membership_type: Option<MembershipType>,
    pub shares_owned: Option<i64>,
    pub credit_score: Option<i64>,
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
    pub guarantors: Option<Vec<Guarantor>>,
    /// Status changes run through the membership state machine. Moving
    /// into Active belongs to the activation handler, not here.
    pub status: Option<MembershipStatus>,
}

/// Result of a successful member update.
#[derive(Debug, Clone)]
pub struct UpdateMemberResult {
    pub member: Member,
}

/// Handler for member profile updates.
pub struct UpdateMemberHandler {
    member_repository: Arc<dyn MemberRepository>,
}

impl UpdateMemberHandler {
    pub fn new(member_repository: Arc<dyn MemberRepository>) -> Self {
        Self { member_repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMemberCommand,
    ) -> Result<UpdateMemberResult, MembershipError> {
        let mut member = self
            .member_repository
            .find_by_id(&cmd.member_id)
            .await?
            .filter(|m| m.cooperative_id == cmd.cooperative_id)
            .ok_or_else(|| MembershipError::not_found(cmd.member_id, cmd.cooperative_id))?;

        if let Some(status) = cmd.status {
            if status == MembershipStatus::Active {
                return Err(MembershipError::validation(
                    "status",
                    "Activation must go through the activation flow",
                ));
            }
            let current = member.status;
            member.change_status(status).map_err(|_| {
                MembershipError::invalid_transition(
                    format!("{:?}", current),
                    format!("{:?}", status),
                )
            })?;
        }

        if let Some(role) = cmd.role {
            member.role = role;
        }
        if let Some(membership_type) = cmd.membership_type {
            member.membership_type = membership_type;
        }
        if let Some(shares_owned) = cmd.shares_owned {
            member.shares_owned = shares_owned;
        }
        if let Some(credit_score) = cmd.credit_score {
            member.credit_score = credit_score;
        }
        if let Some(contacts) = cmd.emergency_contacts {
            member.emergency_contacts = contacts;
        }
        if let Some(guarantors) = cmd.guarantors {
            member.guarantors = guarantors;
        }

        if let Err(e) = self.member_repository.update(&member).await {
            if e.code == ErrorCode::MemberNotFound {
                return Err(MembershipError::update_failed(cmd.member_id));
            }
            return Err(e.into());
        }

        Ok(UpdateMemberResult { member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMemberRepository;
    use crate::domain::foundation::UserId;
    use crate::domain::membership::MembershipIdentifiers;

    async fn seeded_active() -> (Arc<InMemoryMemberRepository>, Member) {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let mut member = Member::new_pending(
            MemberId::new(),
            UserId::new(),
            CooperativeId::new(),
            MembershipType::Regular,
            Vec::new(),
            Vec::new(),
            None,
        );
        repo.save(&member).await.unwrap();
        member
            .activate(MembershipIdentifiers::generate("THEOCR", 2025, 0).unwrap())
            .unwrap();
        repo.update(&member).await.unwrap();
        (repo, member)
    }

    #[tokio::test]
    async fn patches_profile_fields() {
        let (repo, member) = seeded_active().await;
        let handler = UpdateMemberHandler::new(repo.clone());

        let result = handler
            .handle(UpdateMemberCommand {
                member_id: member.id,
                cooperative_id: member.cooperative_id,
                role: Some(CooperativeRole::Treasurer),
                shares_owned: Some(25),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.member.role, CooperativeRole::Treasurer);
        assert_eq!(result.member.shares_owned, 25);
        // Identifiers are never touched by a profile patch.
        assert_eq!(result.member.membership_id, member.membership_id);
    }

    #[tokio::test]
    async fn suspends_an_active_member() {
        let (repo, member) = seeded_active().await;
        let handler = UpdateMemberHandler::new(repo.clone());

        let result = handler
            .handle(UpdateMemberCommand {
                member_id: member.id,
                cooperative_id: member.cooperative_id,
                status: Some(MembershipStatus::Suspended),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.member.status, MembershipStatus::Suspended);
    }

    #[tokio::test]
    async fn activation_through_patch_is_rejected() {
        let (repo, member) = seeded_active().await;
        let handler = UpdateMemberHandler::new(repo);

        let err = handler
            .handle(UpdateMemberCommand {
                member_id: member.id,
                cooperative_id: member.cooperative_id,
                status: Some(MembershipStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn terminated_member_cannot_be_suspended() {
        let (repo, member) = seeded_active().await;
        let handler = UpdateMemberHandler::new(repo.clone());

        handler
            .handle(UpdateMemberCommand {
                member_id: member.id,
                cooperative_id: member.cooperative_id,
                status: Some(MembershipStatus::Terminated),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = handler
            .handle(UpdateMemberCommand {
                member_id: member.id,
                cooperative_id: member.cooperative_id,
                status: Some(MembershipStatus::Suspended),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let repo = Arc::new(InMemoryMemberRepository::new());
        let handler = UpdateMemberHandler::new(repo);

        let err = handler
            .handle(UpdateMemberCommand {
                member_id: MemberId::new(),
                cooperative_id: CooperativeId::new(),
                shares_owned: Some(1),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::NotFound { .. }));
    }
}
