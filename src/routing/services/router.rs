//! Session routing orchestration.
//!
//! [`SessionRouterService`] owns session creation and per-session caller
//! interactions: idempotent get-or-create, integrity verification, turn
//! recording, and session close-out. Ownership changes are the failover
//! coordinator's job.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::HealthPolicy;
use crate::health::ports::HealthRepository;
use crate::registry::domain::{AgentId, AgentKind};
use crate::registry::ports::{AgentRepository, AgentRepositoryError};
use crate::routing::domain::{
    CallerKey, NewSessionParams, RouterSecret, Session, SessionId, Speaker,
};
use crate::routing::ports::{SessionRepository, SessionRepositoryError};
use crate::routing::services::placement::PlacementEngine;
use crate::routing::services::{RoutingServiceError, RoutingServiceResult};

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Session placement and caller-facing session operations.
pub struct SessionRouterService<S, R, H, C>
where
    S: SessionRepository,
    R: AgentRepository,
    H: HealthRepository,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    agents: Arc<R>,
    placement: PlacementEngine<R, H>,
    clock: Arc<C>,
    secret: RouterSecret,
}

impl<S, R, H, C> SessionRouterService<S, R, H, C>
where
    S: SessionRepository,
    R: AgentRepository,
    H: HealthRepository,
    C: Clock + Send + Sync,
{
    /// Creates a router over the given collaborators.
    #[must_use]
    pub fn new(
        sessions: Arc<S>,
        agents: Arc<R>,
        health: Arc<H>,
        clock: Arc<C>,
        secret: RouterSecret,
        policy: HealthPolicy,
    ) -> Self {
        let placement = PlacementEngine::new(Arc::clone(&agents), health, policy);
        Self {
            sessions,
            agents,
            placement,
            clock,
            secret,
        }
    }

    /// Returns the caller's active session of `kind`, creating one when none
    /// exists.
    ///
    /// An existing session is returned unchanged even when its agent has
    /// since degraded; moving it is the failover coordinator's decision. On
    /// creation the best-ranked active agent receives the session and its
    /// advisory counter is incremented. Two racing creations for the same
    /// caller and kind converge on the session that won the insert.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::Domain`] for an invalid caller key,
    /// [`RoutingServiceError::NoAvailableAgent`] when no active agent of the
    /// kind exists, or a persistence error.
    pub async fn get_or_create_session(
        &self,
        caller_key: &str,
        kind: AgentKind,
    ) -> RoutingServiceResult<Session> {
        let caller = CallerKey::new(caller_key)?;

        if let Some(existing) = self.sessions.find_active(&caller, kind).await? {
            return Ok(existing);
        }

        let agent = self
            .placement
            .place(kind, &[], false)
            .await?
            .ok_or(RoutingServiceError::NoAvailableAgent(kind))?;

        let session = Session::new(
            NewSessionParams {
                caller_key: caller.clone(),
                kind,
                agent_id: agent.id(),
            },
            &self.secret,
            &*self.clock,
        );

        match self.sessions.insert(&session).await {
            Ok(()) => {
                self.adjust_session_counter(agent.id(), 1).await;
                info!(
                    session_id = %session.id(),
                    agent_id = %agent.id(),
                    kind = %kind,
                    "session created"
                );
                Ok(session)
            }
            Err(SessionRepositoryError::DuplicateActiveSession(existing_id)) => {
                // Lost the creation race; the stored session wins.
                self.sessions
                    .find_by_id(existing_id)
                    .await?
                    .ok_or(RoutingServiceError::SessionNotFound(existing_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Compares a presented integrity token in constant time.
    ///
    /// A mismatch carries no detail beyond `false`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::SessionNotFound`] when the session
    /// does not exist, or a persistence error.
    pub async fn verify_integrity(
        &self,
        session_id: SessionId,
        presented: &str,
    ) -> RoutingServiceResult<bool> {
        let session = self.find_or_error(session_id).await?;
        Ok(session.verify_integrity(presented))
    }

    /// Appends one turn to a session's history.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::SessionNotFound`] for an unknown
    /// session, [`RoutingServiceError::Domain`] when the session is closed
    /// or the content empty, or a persistence error.
    pub async fn record_turn(
        &self,
        session_id: SessionId,
        speaker: Speaker,
        content: &str,
    ) -> RoutingServiceResult<Session> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut session = self.find_or_error(session_id).await?;
            session.record_turn(speaker, content, self.clock.utc())?;
            match self.sessions.update(&session).await {
                Ok(()) => return Ok(session),
                Err(SessionRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(RoutingServiceError::Contention(session_id))
    }

    /// Ends a session and releases its slot on the owning agent.
    ///
    /// Idempotent: closing an already-closed session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::SessionNotFound`] for an unknown
    /// session, or a persistence error.
    pub async fn close_session(&self, session_id: SessionId) -> RoutingServiceResult<Session> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut session = self.find_or_error(session_id).await?;
            if !session.is_active() {
                return Ok(session);
            }
            let owner = session.agent_id();
            session.close(self.clock.utc());
            match self.sessions.update(&session).await {
                Ok(()) => {
                    self.adjust_session_counter(owner, -1).await;
                    info!(session_id = %session_id, agent_id = %owner, "session closed");
                    return Ok(session);
                }
                Err(SessionRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(RoutingServiceError::Contention(session_id))
    }

    /// Looks up a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::Sessions`] when persistence lookup
    /// fails.
    pub async fn get(&self, session_id: SessionId) -> RoutingServiceResult<Option<Session>> {
        Ok(self.sessions.find_by_id(session_id).await?)
    }

    async fn find_or_error(&self, session_id: SessionId) -> RoutingServiceResult<Session> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or(RoutingServiceError::SessionNotFound(session_id))
    }

    /// Best-effort adjustment of an agent's advisory session counter.
    async fn adjust_session_counter(&self, agent_id: AgentId, delta: i32) {
        if let Err(err) = adjust_counter(&*self.agents, agent_id, delta).await {
            warn!(agent_id = %agent_id, delta, error = %err, "session counter adjustment failed");
        }
    }
}

/// Failure of an advisory counter adjustment; logged, never propagated.
#[derive(Debug, Error)]
pub(crate) enum CounterAdjustError {
    #[error("agent not found")]
    NotFound,
    #[error("persistent write contention")]
    Contention,
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
}

/// Applies `delta` to an agent's session counter with bounded retries.
pub(crate) async fn adjust_counter<R: AgentRepository>(
    agents: &R,
    agent_id: AgentId,
    delta: i32,
) -> Result<(), CounterAdjustError> {
    for _ in 0..MAX_CAS_ATTEMPTS {
        let Some(mut record) = agents.find_by_id(agent_id).await? else {
            return Err(CounterAdjustError::NotFound);
        };
        if delta >= 0 {
            record.increment_sessions();
        } else {
            record.decrement_sessions();
        }
        match agents.update(&record).await {
            Ok(()) => return Ok(()),
            Err(AgentRepositoryError::VersionConflict(_)) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Err(CounterAdjustError::Contention)
}
