//! Outbound failover requests.

use async_trait::async_trait;

use crate::registry::domain::AgentId;
use crate::routing::domain::SessionId;

/// A request to move one session off a failing agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailoverRequest {
    /// The stranded session.
    pub session_id: SessionId,
    /// The agent the session should be moved away from.
    pub from_agent: AgentId,
}

/// Fire-and-forget sink for failover requests.
///
/// Delivery is best effort; the monitor never blocks on or observes the
/// outcome of a request.
#[async_trait]
pub trait FailoverRequestSink: Send + Sync {
    /// Submits a failover request.
    async fn request_failover(&self, request: FailoverRequest);
}
