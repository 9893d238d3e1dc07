//! In-memory MemberRepository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode, MemberId, UserId};
use crate::domain::membership::Member;
use crate::ports::MemberRepository;

/// In-memory implementation of the MemberRepository port.
#[derive(Default)]
pub struct InMemoryMemberRepository {
    members: RwLock<HashMap<MemberId, Member>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored members (for test assertions).
    pub fn count(&self) -> usize {
        self.members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned")
            .len()
    }
}

/// Extracts the year segment of a membership ID ("HANDLE-YEAR-N").
fn identifier_year(membership_id: &str) -> Option<&str> {
    membership_id.split('-').nth(1)
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let mut store = self
            .members
            .write()
            .expect("InMemoryMemberRepository: lock poisoned");

        if store
            .values()
            .any(|m| m.user_id == member.user_id && m.cooperative_id == member.cooperative_id)
        {
            return Err(DomainError::new(
                ErrorCode::DuplicateMembership,
                "User already has a membership in this cooperative",
            ));
        }

        store.insert(member.id, member.clone());
        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<(), DomainError> {
        let mut store = self
            .members
            .write()
            .expect("InMemoryMemberRepository: lock poisoned");

        if !store.contains_key(&member.id) {
            return Err(DomainError::new(ErrorCode::MemberNotFound, "Member not found"));
        }

        if let Some(membership_id) = &member.membership_id {
            let taken = store.values().any(|m| {
                m.id != member.id
                    && m.cooperative_id == member.cooperative_id
                    && m.membership_id.as_deref() == Some(membership_id)
            });
            if taken {
                return Err(DomainError::new(
                    ErrorCode::Conflict,
                    "Membership ID already assigned to another member",
                ));
            }
        }

        store.insert(member.id, member.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_user_and_cooperative(
        &self,
        user_id: &UserId,
        cooperative_id: &CooperativeId,
    ) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned")
            .values()
            .find(|m| &m.user_id == user_id && &m.cooperative_id == cooperative_id)
            .cloned())
    }

    async fn count_activated_in_year(
        &self,
        cooperative_id: &CooperativeId,
        year: i32,
    ) -> Result<u64, DomainError> {
        let year = year.to_string();
        Ok(self
            .members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned")
            .values()
            .filter(|m| &m.cooperative_id == cooperative_id)
            .filter(|m| {
                m.membership_id
                    .as_deref()
                    .and_then(identifier_year)
                    .map_or(false, |y| y == year)
            })
            .count() as u64)
    }
}
