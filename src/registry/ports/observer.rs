//! Lifecycle observer port.
//!
//! Agent lifecycle changes have side effects owned by other modules: the
//! session store flags a deactivated agent's live sessions for failover, and
//! the health store resets a reactivated agent's summary. The registry
//! notifies observers after the status change is persisted; it never moves
//! sessions or rewrites health state itself.

use crate::registry::domain::AgentId;
use async_trait::async_trait;

/// Observer notified after an agent lifecycle transition is persisted.
///
/// Notifications are best-effort fan-out: observer failures are logged by the
/// registry service and never roll back the lifecycle change.
#[async_trait]
pub trait LifecycleObserver: Send + Sync {
    /// Called after an agent has been set inactive.
    async fn agent_deactivated(&self, agent_id: AgentId);

    /// Called after an agent has been set active again.
    async fn agent_reactivated(&self, agent_id: AgentId) {
        let _ = agent_id;
    }
}
