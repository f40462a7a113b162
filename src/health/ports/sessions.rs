//! Read-only view of session ownership.

use async_trait::async_trait;

use crate::registry::domain::AgentId;
use crate::routing::domain::SessionId;

/// Enumerates the active sessions owned by an agent.
///
/// Used on the fire-and-forget failover path; implementations return an
/// empty list when the store cannot be read.
#[async_trait]
pub trait ActiveSessionSource: Send + Sync {
    /// Identifiers of every active session currently owned by `agent_id`.
    async fn active_sessions_owned_by(&self, agent_id: AgentId) -> Vec<SessionId>;
}
