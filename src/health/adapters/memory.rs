//! In-memory health store.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::health::{
    domain::{HealthCheckRecord, HealthSummary},
    ports::{HealthRepository, HealthRepositoryError, HealthRepositoryResult},
};
use crate::registry::domain::AgentId;

/// Probe results retained per agent.
const CHECK_LOG_CAPACITY: usize = 100;

/// Thread-safe in-memory health repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHealthRepository {
    state: Arc<RwLock<HealthState>>,
}

#[derive(Debug, Default)]
struct HealthState {
    summaries: HashMap<AgentId, HealthSummary>,
    checks: HashMap<AgentId, VecDeque<HealthCheckRecord>>,
}

impl InMemoryHealthRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthRepository for InMemoryHealthRepository {
    async fn save_summary(&self, summary: &HealthSummary) -> HealthRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| HealthRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        if let Some(stored) = state.summaries.get(&summary.agent_id())
            && stored.version() != summary.version()
        {
            return Err(HealthRepositoryError::VersionConflict(summary.agent_id()));
        }

        let mut next = summary.clone();
        next.advance_version();
        state.summaries.insert(next.agent_id(), next);
        Ok(())
    }

    async fn find_summary(
        &self,
        agent_id: AgentId,
    ) -> HealthRepositoryResult<Option<HealthSummary>> {
        let state = self
            .state
            .read()
            .map_err(|err| HealthRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.summaries.get(&agent_id).cloned())
    }

    async fn append_check(&self, record: &HealthCheckRecord) -> HealthRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| HealthRepositoryError::persistence(std::io::Error::other(err.to_string())))?;

        let log = state.checks.entry(record.agent_id()).or_default();
        log.push_back(record.clone());
        while log.len() > CHECK_LOG_CAPACITY {
            log.pop_front();
        }
        Ok(())
    }

    async fn recent_checks(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> HealthRepositoryResult<Vec<HealthCheckRecord>> {
        let state = self
            .state
            .read()
            .map_err(|err| HealthRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let records = state
            .checks
            .get(&agent_id)
            .map(|log| log.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(records)
    }
}
