//! Cooperative repository port.
//!
//! # Design
//!
//! - **Write-focused**: Optimized for aggregate persistence
//! - **Unique constraint**: One cooperative per acronym, platform-wide
//! - **No deletes**: Cooperatives leave by status transition

use crate::domain::cooperative::Cooperative;
use crate::domain::foundation::{CooperativeId, DomainError};
use async_trait::async_trait;

/// Repository port for Cooperative aggregate persistence.
#[async_trait]
pub trait CooperativeRepository: Send + Sync {
    /// Save a new cooperative.
    ///
    /// # Errors
    ///
    /// - `DuplicateAcronym` if the acronym is already registered
    /// - `DatabaseError` on persistence failure
    async fn save(&self, cooperative: &Cooperative) -> Result<(), DomainError>;

    /// Update an existing cooperative, including its embedded audit trail.
    ///
    /// # Errors
    ///
    /// - `CooperativeNotFound` if the cooperative doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, cooperative: &Cooperative) -> Result<(), DomainError>;

    /// Find a cooperative by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &CooperativeId) -> Result<Option<Cooperative>, DomainError>;

    /// Find a cooperative by its acronym. Returns `None` if not found.
    async fn find_by_acronym(&self, acronym: &str) -> Result<Option<Cooperative>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooperative_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CooperativeRepository) {}
    }
}
