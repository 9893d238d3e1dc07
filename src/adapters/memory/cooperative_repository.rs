//! In-memory CooperativeRepository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::cooperative::Cooperative;
use crate::domain::foundation::{CooperativeId, DomainError, ErrorCode};
use crate::ports::CooperativeRepository;

/// In-memory implementation of the CooperativeRepository port.
#[derive(Default)]
pub struct InMemoryCooperativeRepository {
    cooperatives: RwLock<HashMap<CooperativeId, Cooperative>>,
}

impl InMemoryCooperativeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored cooperatives (for test assertions).
    pub fn count(&self) -> usize {
        self.cooperatives
            .read()
            .expect("InMemoryCooperativeRepository: lock poisoned")
            .len()
    }
}

#[async_trait]
impl CooperativeRepository for InMemoryCooperativeRepository {
    async fn save(&self, cooperative: &Cooperative) -> Result<(), DomainError> {
        let mut store = self
            .cooperatives
            .write()
            .expect("InMemoryCooperativeRepository: lock poisoned");

        if store.values().any(|c| c.acronym == cooperative.acronym) {
            return Err(DomainError::new(
                ErrorCode::DuplicateAcronym,
                "A cooperative with this acronym already exists",
            ));
        }

        store.insert(cooperative.id, cooperative.clone());
        Ok(())
    }

    async fn update(&self, cooperative: &Cooperative) -> Result<(), DomainError> {
        let mut store = self
            .cooperatives
            .write()
            .expect("InMemoryCooperativeRepository: lock poisoned");

        if !store.contains_key(&cooperative.id) {
            return Err(DomainError::new(
                ErrorCode::CooperativeNotFound,
                "Cooperative not found",
            ));
        }

        store.insert(cooperative.id, cooperative.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CooperativeId) -> Result<Option<Cooperative>, DomainError> {
        Ok(self
            .cooperatives
            .read()
            .expect("InMemoryCooperativeRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_acronym(&self, acronym: &str) -> Result<Option<Cooperative>, DomainError> {
        Ok(self
            .cooperatives
            .read()
            .expect("InMemoryCooperativeRepository: lock poisoned")
            .values()
            .find(|c| c.acronym == acronym)
            .cloned())
    }
}
