//! Persistence contract for health summaries and the check log.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

use crate::health::domain::{HealthCheckRecord, HealthSummary};
use crate::registry::domain::AgentId;

/// Errors surfaced by health persistence.
#[derive(Debug, Clone, Error)]
pub enum HealthRepositoryError {
    /// No summary exists for the agent.
    #[error("no health summary for agent {0}")]
    NotFound(AgentId),

    /// The stored summary changed since it was read.
    #[error("health summary for agent {0} was modified concurrently")]
    VersionConflict(AgentId),

    /// The underlying store failed.
    #[error("health persistence failure: {0}")]
    Persistence(#[source] Arc<dyn Error + Send + Sync>),
}

impl HealthRepositoryError {
    /// Wraps a storage failure.
    #[must_use]
    pub fn persistence(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for health persistence operations.
pub type HealthRepositoryResult<T> = Result<T, HealthRepositoryError>;

/// Store for per-agent health summaries and a bounded probe log.
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Stores a summary, creating it when absent.
    ///
    /// When a summary already exists its version must match the one being
    /// written, otherwise [`HealthRepositoryError::VersionConflict`] is
    /// returned and nothing changes.
    async fn save_summary(&self, summary: &HealthSummary) -> HealthRepositoryResult<()>;

    /// Looks up an agent's summary.
    async fn find_summary(&self, agent_id: AgentId) -> HealthRepositoryResult<Option<HealthSummary>>;

    /// Appends one probe result to the agent's bounded check log.
    async fn append_check(&self, record: &HealthCheckRecord) -> HealthRepositoryResult<()>;

    /// Returns the most recent checks for an agent, newest first.
    async fn recent_checks(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> HealthRepositoryResult<Vec<HealthCheckRecord>>;
}
