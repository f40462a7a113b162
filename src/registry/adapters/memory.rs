//! In-memory agent repository.
//!
//! Reference semantics for the durable store contract: per-entity optimistic
//! versioning, unique name index, no global lock beyond the single map guard.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::registry::{
    domain::{AgentId, AgentKind, AgentName, AgentRecord, AgentStatus},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<RepositoryState>>,
}

#[derive(Debug, Default)]
struct RepositoryState {
    agents: HashMap<AgentId, AgentRecord>,
    name_index: HashMap<AgentName, AgentId>,
}

impl InMemoryAgentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        if state.agents.contains_key(&record.id()) {
            return Err(AgentRepositoryError::DuplicateAgent(record.id()));
        }
        if state.name_index.contains_key(record.name()) {
            return Err(AgentRepositoryError::DuplicateAgentName(record.name().clone()));
        }

        state.name_index.insert(record.name().clone(), record.id());
        state.agents.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        let stored = state
            .agents
            .get(&record.id())
            .ok_or(AgentRepositoryError::NotFound(record.id()))?;

        if stored.version() != record.version() {
            return Err(AgentRepositoryError::VersionConflict(record.id()));
        }

        let old_name = stored.name().clone();
        if *record.name() != old_name {
            if let Some(&indexed_id) = state.name_index.get(record.name())
                && indexed_id != record.id()
            {
                return Err(AgentRepositoryError::DuplicateAgentName(record.name().clone()));
            }
            state.name_index.remove(&old_name);
            state.name_index.insert(record.name().clone(), record.id());
        }

        let mut next = record.clone();
        next.advance_version();
        state.agents.insert(next.id(), next);
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.agents.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<AgentRecord>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let record = state
            .name_index
            .get(name)
            .and_then(|id| state.agents.get(id))
            .cloned();
        Ok(record)
    }

    async fn list_active_by_kind(&self, kind: AgentKind) -> AgentRepositoryResult<Vec<AgentRecord>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let matching = state
            .agents
            .values()
            .filter(|record| record.status() == AgentStatus::Active && record.kind() == kind)
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.agents.values().cloned().collect())
    }
}
