//! Delegate for agent lifecycle changes driven by health state.

use async_trait::async_trait;
use mockable::Clock;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

use crate::registry::domain::AgentId;
use crate::registry::ports::AgentRepository;
use crate::registry::services::AgentRegistryService;

/// Error raised when a lifecycle change could not be applied.
#[derive(Debug, Clone, Error)]
#[error("lifecycle change for agent {agent_id} failed: {source}")]
pub struct AgentLifecycleError {
    /// The agent whose lifecycle change failed.
    pub agent_id: AgentId,
    #[source]
    source: Arc<dyn Error + Send + Sync>,
}

impl AgentLifecycleError {
    /// Wraps the underlying failure.
    #[must_use]
    pub fn new(agent_id: AgentId, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            agent_id,
            source: Arc::new(source),
        }
    }
}

/// Authority over agent availability.
///
/// The monitor never mutates agent records itself; disabling is delegated so
/// the registry remains the single writer and its lifecycle observers fire.
#[async_trait]
pub trait AgentLifecycle: Send + Sync {
    /// Takes an agent out of rotation. Idempotent.
    async fn disable_agent(&self, agent_id: AgentId) -> Result<(), AgentLifecycleError>;
}

#[async_trait]
impl<R, C> AgentLifecycle for AgentRegistryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    async fn disable_agent(&self, agent_id: AgentId) -> Result<(), AgentLifecycleError> {
        self.deactivate(agent_id)
            .await
            .map(|_| ())
            .map_err(|err| AgentLifecycleError::new(agent_id, err))
    }
}
