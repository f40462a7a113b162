//! Registry lifecycle observer that flags sessions for failover.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::registry::domain::AgentId;
use crate::registry::ports::LifecycleObserver;
use crate::routing::ports::SessionRepository;

/// Marks an agent's live sessions failover-pending when the agent is
/// deactivated.
///
/// Registered with the registry service; the registry itself never moves
/// sessions. The flagged sessions are picked up by whatever drives the
/// failover coordinator.
pub struct SessionFailoverFlagger<S: SessionRepository> {
    sessions: Arc<S>,
}

impl<S: SessionRepository> SessionFailoverFlagger<S> {
    /// Creates a flagger over the session store.
    #[must_use]
    pub const fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<S: SessionRepository> LifecycleObserver for SessionFailoverFlagger<S> {
    async fn agent_deactivated(&self, agent_id: AgentId) {
        match self.sessions.flag_failover_pending(agent_id).await {
            Ok(flagged) if flagged.is_empty() => {}
            Ok(flagged) => {
                info!(
                    agent_id = %agent_id,
                    sessions = flagged.len(),
                    "flagged sessions for failover after agent deactivation"
                );
            }
            Err(err) => {
                warn!(agent_id = %agent_id, error = %err, "failed to flag sessions for failover");
            }
        }
    }
}
