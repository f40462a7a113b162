//! Service-level errors shared by the router and the failover coordinator.

use thiserror::Error;

use crate::health::ports::HealthRepositoryError;
use crate::registry::domain::AgentKind;
use crate::registry::ports::AgentRepositoryError;
use crate::routing::domain::{RoutingDomainError, SessionId};
use crate::routing::ports::SessionRepositoryError;

/// Errors surfaced by routing operations.
#[derive(Debug, Error)]
pub enum RoutingServiceError {
    /// Domain validation failed; no state was changed.
    #[error(transparent)]
    Domain(#[from] RoutingDomainError),

    /// Session persistence failed.
    #[error(transparent)]
    Sessions(#[from] SessionRepositoryError),

    /// Agent persistence failed.
    #[error(transparent)]
    Agents(#[from] AgentRepositoryError),

    /// Health persistence failed.
    #[error(transparent)]
    Health(#[from] HealthRepositoryError),

    /// No active agent of the requested kind can take the session.
    #[error("no available agent of kind {0}")]
    NoAvailableAgent(AgentKind),

    /// The session does not exist or is no longer active.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// Optimistic-concurrency retries were exhausted.
    #[error("persistent write contention on session {0}")]
    Contention(SessionId),
}

/// Result type for routing service operations.
pub type RoutingServiceResult<T> = Result<T, RoutingServiceError>;
