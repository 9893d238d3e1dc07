//! Member repository port.
//!
//! # Design
//!
//! - **Write-focused**: Optimized for aggregate persistence
//! - **Unique constraints**: One membership per (user, cooperative);
//!   membership IDs unique per cooperative
//! - **Activation counting**: Identifier sequence numbers come from the
//!   count of members activated in a cooperative in a given year

use crate::domain::foundation::{CooperativeId, DomainError, MemberId, UserId};
use crate::domain::membership::Member;
use async_trait::async_trait;

/// Repository port for Member aggregate persistence.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a new member.
    ///
    /// # Errors
    ///
    /// - `DuplicateMembership` if the user already belongs to the cooperative
    /// - `DatabaseError` on persistence failure
    async fn save(&self, member: &Member) -> Result<(), DomainError>;

    /// Update an existing member.
    ///
    /// Implementations surface a membership ID collision from a
    /// concurrent activation as `DuplicateMembership` on the
    /// `Conflict` code so callers can retry with a fresh sequence.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    /// - `Conflict` if the assigned membership ID is already taken
    /// - `DatabaseError` on persistence failure
    async fn update(&self, member: &Member) -> Result<(), DomainError>;

    /// Find a member by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// Find a user's membership in a specific cooperative.
    ///
    /// Returns `None` if the user has never joined the cooperative.
    async fn find_by_user_and_cooperative(
        &self,
        user_id: &UserId,
        cooperative_id: &CooperativeId,
    ) -> Result<Option<Member>, DomainError>;

    /// Count members of a cooperative that hold identifiers minted in
    /// the given year.
    ///
    /// Feeds the sequence number for the next membership ID.
    async fn count_activated_in_year(
        &self,
        cooperative_id: &CooperativeId,
        year: i32,
    ) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MemberRepository) {}
    }
}
