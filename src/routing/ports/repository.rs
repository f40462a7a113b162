//! Persistence contract for sessions.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

use crate::registry::domain::{AgentId, AgentKind};
use crate::routing::domain::{CallerKey, Session, SessionId};

/// Errors surfaced by session persistence.
#[derive(Debug, Clone, Error)]
pub enum SessionRepositoryError {
    /// The caller already has an active session of this kind.
    #[error("caller already has active session {0} of this kind")]
    DuplicateActiveSession(SessionId),

    /// No session exists with the given identifier.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The stored session changed since it was read.
    #[error("session {0} was modified concurrently")]
    VersionConflict(SessionId),

    /// The underlying store failed.
    #[error("session persistence failure: {0}")]
    Persistence(#[source] Arc<dyn Error + Send + Sync>),
}

impl SessionRepositoryError {
    /// Wraps a storage failure.
    #[must_use]
    pub fn persistence(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for session persistence operations.
pub type SessionRepositoryResult<T> = Result<T, SessionRepositoryError>;

/// Store for sessions, enforcing one active session per caller and kind.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts a new session.
    ///
    /// Fails with [`SessionRepositoryError::DuplicateActiveSession`] when an
    /// active session already exists for the same caller key and kind; the
    /// error carries the surviving session's id.
    async fn insert(&self, session: &Session) -> SessionRepositoryResult<()>;

    /// Stores an updated session.
    ///
    /// The stored version must match the one being written, otherwise
    /// [`SessionRepositoryError::VersionConflict`] is returned and nothing
    /// changes.
    async fn update(&self, session: &Session) -> SessionRepositoryResult<()>;

    /// Looks up a session by id.
    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>>;

    /// Finds the caller's active session of the given kind.
    async fn find_active(
        &self,
        caller_key: &CallerKey,
        kind: AgentKind,
    ) -> SessionRepositoryResult<Option<Session>>;

    /// Lists every active session owned by an agent.
    async fn list_active_by_agent(
        &self,
        agent_id: AgentId,
    ) -> SessionRepositoryResult<Vec<Session>>;

    /// Marks every active session owned by an agent as failover-pending.
    ///
    /// Returns the affected session ids. Applied atomically per session.
    async fn flag_failover_pending(
        &self,
        agent_id: AgentId,
    ) -> SessionRepositoryResult<Vec<SessionId>>;
}
