//! Repository port for agent record persistence and discovery.

use crate::registry::domain::{AgentId, AgentKind, AgentName, AgentRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent record persistence contract.
///
/// Every mutation is an atomic read-modify-write against one agent key.
/// Implementations must reject an [`update`](AgentRepository::update) whose
/// version stamp no longer matches the stored row, so a conflicting
/// concurrent writer retries instead of silently overwriting.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::DuplicateAgent`] when the agent ID
    /// already exists or [`AgentRepositoryError::DuplicateAgentName`] when
    /// the name is already registered.
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()>;

    /// Persists changes to an existing agent record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist, or [`AgentRepositoryError::VersionConflict`] when the record's
    /// version stamp is stale.
    async fn update(&self, record: &AgentRecord) -> AgentRepositoryResult<()>;

    /// Finds an agent record by identifier.
    ///
    /// Returns `None` when the agent does not exist.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Finds an agent record by unique name.
    ///
    /// Returns `None` when no agent has the given name.
    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Returns all agents with `Active` status and the given kind.
    async fn list_active_by_kind(&self, kind: AgentKind) -> AgentRepositoryResult<Vec<AgentRecord>>;

    /// Returns all agent records regardless of status.
    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// An agent with the same identifier already exists.
    #[error("duplicate agent identifier: {0}")]
    DuplicateAgent(AgentId),

    /// An agent with the same name already exists.
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(AgentName),

    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// The record's version stamp is stale; a concurrent writer won.
    #[error("version conflict on agent {0}")]
    VersionConflict(AgentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
