//! Failover of live sessions.
//!
//! The coordinator is the only writer of a session's owning-agent field.
//! Reassignment is a single compare-and-swap on the session record, so a
//! session always has exactly one owner; concurrent failovers of the same
//! session converge on the no-op path.

use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::HealthPolicy;
use crate::health::ports::HealthRepository;
use crate::registry::domain::{AgentId, AgentStatus};
use crate::registry::ports::AgentRepository;
use crate::routing::domain::{Session, SessionId};
use crate::routing::ports::{SessionRepository, SessionRepositoryError};
use crate::routing::services::placement::PlacementEngine;
use crate::routing::services::router::adjust_counter;
use crate::routing::services::{RoutingServiceError, RoutingServiceResult};

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Result of a failover attempt.
#[derive(Debug, Clone)]
pub struct FailoverOutcome {
    /// The session after the attempt.
    pub session: Session,
    /// The owner before the attempt.
    pub previous_agent: AgentId,
    /// The owner after the attempt; equals `previous_agent` on a no-op.
    pub new_agent: AgentId,
    /// Whether ownership actually changed.
    pub moved: bool,
}

/// Moves sessions off failing agents.
pub struct FailoverCoordinator<S, R, H, C>
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
}

impl<S, R, H, C> FailoverCoordinator<S, R, H, C>
where
    S: SessionRepository,
    R: AgentRepository,
    H: HealthRepository,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over the given collaborators.
    #[must_use]
    pub fn new(
        sessions: Arc<S>,
        agents: Arc<R>,
        health: Arc<H>,
        clock: Arc<C>,
        policy: HealthPolicy,
    ) -> Self {
        let placement = PlacementEngine::new(Arc::clone(&agents), health, policy);
        Self {
            sessions,
            agents,
            placement,
            clock,
        }
    }

    /// Attempts to move a session off its current agent.
    ///
    /// A no-op success when the owner is active, not unhealthy, and the
    /// session is not flagged. The replacement is the best-ranked active
    /// agent of the session's kind, excluding the current owner and any
    /// agent currently judged unhealthy. History is carried over untouched;
    /// advisory counters are adjusted after the swap.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingServiceError::SessionNotFound`] for an unknown or
    /// closed session, [`RoutingServiceError::NoAvailableAgent`] when no
    /// replacement exists (the session stays on its owner), or
    /// [`RoutingServiceError::Contention`] on exhausted retries.
    pub async fn failover(&self, session_id: SessionId) -> RoutingServiceResult<FailoverOutcome> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let session = self
                .sessions
                .find_by_id(session_id)
                .await?
                .ok_or(RoutingServiceError::SessionNotFound(session_id))?;
            if !session.is_active() {
                return Err(RoutingServiceError::SessionNotFound(session_id));
            }

            let owner = session.agent_id();
            if !session.failover_pending() && self.owner_is_serviceable(owner).await? {
                return Ok(FailoverOutcome {
                    session,
                    previous_agent: owner,
                    new_agent: owner,
                    moved: false,
                });
            }

            let Some(replacement) = self.placement.place(session.kind(), &[owner], true).await?
            else {
                warn!(
                    session_id = %session_id,
                    agent_id = %owner,
                    "failover found no replacement; session stays put"
                );
                return Err(RoutingServiceError::NoAvailableAgent(session.kind()));
            };

            let mut updated = session;
            updated.reassign(replacement.id(), self.clock.utc());
            match self.sessions.update(&updated).await {
                Ok(()) => {
                    self.adjust_counters(owner, replacement.id()).await;
                    info!(
                        session_id = %session_id,
                        from_agent = %owner,
                        to_agent = %replacement.id(),
                        "session failed over"
                    );
                    return Ok(FailoverOutcome {
                        session: updated,
                        previous_agent: owner,
                        new_agent: replacement.id(),
                        moved: true,
                    });
                }
                // Another coordinator touched the session; re-read and
                // re-evaluate from scratch.
                Err(SessionRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(RoutingServiceError::Contention(session_id))
    }

    /// Whether the owner can keep serving: registered, active, not
    /// currently unhealthy.
    async fn owner_is_serviceable(&self, owner: AgentId) -> RoutingServiceResult<bool> {
        let Some(record) = self.agents.find_by_id(owner).await? else {
            return Ok(false);
        };
        if record.status() != AgentStatus::Active {
            return Ok(false);
        }
        Ok(!self.placement.is_unhealthy(owner).await?)
    }

    /// Best-effort old−1 / new+1 counter adjustment; each side is
    /// independent and failures are only logged.
    async fn adjust_counters(&self, old_agent: AgentId, new_agent: AgentId) {
        if let Err(err) = adjust_counter(&*self.agents, old_agent, -1).await {
            warn!(agent_id = %old_agent, error = %err, "session counter decrement failed");
        }
        if let Err(err) = adjust_counter(&*self.agents, new_agent, 1).await {
            warn!(agent_id = %new_agent, error = %err, "session counter increment failed");
        }
    }
}
