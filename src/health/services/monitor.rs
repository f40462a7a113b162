//! Health monitoring orchestration.
//!
//! [`HealthMonitorService`] folds probe reports into per-agent summaries,
//! deactivates agents that fail repeatedly, and requests failover for the
//! sessions of an agent that just turned unhealthy.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::config::HealthPolicy;
use crate::health::domain::{CheckId, HealthCheckRecord, HealthStatus, HealthSummary, ProbeReport};
use crate::health::ports::{
    ActiveSessionSource, AgentLifecycle, FailoverRequest, FailoverRequestSink, HealthRepository,
    HealthRepositoryError,
};
use crate::registry::domain::AgentId;
use crate::registry::ports::LifecycleObserver;

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Service-level errors for health operations.
#[derive(Debug, Error)]
pub enum HealthServiceError {
    /// Health persistence failed.
    #[error(transparent)]
    Repository(#[from] HealthRepositoryError),

    /// Optimistic-concurrency retries were exhausted.
    #[error("persistent write contention on health summary for agent {0}")]
    Contention(AgentId),
}

/// Result type for health service operations.
pub type HealthServiceResult<T> = Result<T, HealthServiceError>;

/// Outcome of recording one probe result.
#[derive(Debug, Clone)]
pub struct RecordedCheck {
    /// Identifier of the stored check record.
    pub check_id: CheckId,
    /// Status derived after the observation was applied.
    pub status: HealthStatus,
    /// The updated summary.
    pub summary: HealthSummary,
}

/// Probe ingestion and availability-tracking service.
pub struct HealthMonitorService<H, L, S, A, C>
where
    H: HealthRepository,
    L: AgentLifecycle,
    S: FailoverRequestSink,
    A: ActiveSessionSource,
    C: Clock + Send + Sync,
{
    repository: Arc<H>,
    lifecycle: Arc<L>,
    failover_sink: Arc<S>,
    sessions: Arc<A>,
    clock: Arc<C>,
    policy: HealthPolicy,
}

impl<H, L, S, A, C> HealthMonitorService<H, L, S, A, C>
where
    H: HealthRepository,
    L: AgentLifecycle,
    S: FailoverRequestSink,
    A: ActiveSessionSource,
    C: Clock + Send + Sync,
{
    /// Creates a monitor over the given collaborators.
    #[must_use]
    pub const fn new(
        repository: Arc<H>,
        lifecycle: Arc<L>,
        failover_sink: Arc<S>,
        sessions: Arc<A>,
        clock: Arc<C>,
        policy: HealthPolicy,
    ) -> Self {
        Self {
            repository,
            lifecycle,
            failover_sink,
            sessions,
            clock,
            policy,
        }
    }

    /// Records one probe result against an agent.
    ///
    /// The summary is created at the initial score on the first observation.
    /// Crossing the auto-disable streak deactivates the agent through the
    /// lifecycle delegate; a transition into unhealthy requests failover for
    /// every active session the agent owns. Neither side effect can fail the
    /// recording itself.
    ///
    /// # Errors
    ///
    /// Returns [`HealthServiceError::Repository`] when persistence fails, or
    /// [`HealthServiceError::Contention`] when concurrent writers exhaust
    /// the retry budget.
    pub async fn record_check(
        &self,
        agent_id: AgentId,
        report: ProbeReport,
    ) -> HealthServiceResult<RecordedCheck> {
        let now = self.clock.utc();

        let mut attempts = 0;
        let (summary, was_unhealthy) = loop {
            if attempts == MAX_CAS_ATTEMPTS {
                return Err(HealthServiceError::Contention(agent_id));
            }
            attempts += 1;

            let mut summary = match self.repository.find_summary(agent_id).await? {
                Some(existing) => existing,
                None => HealthSummary::new(agent_id, now),
            };
            let was_unhealthy = summary.status(&self.policy) == HealthStatus::Unhealthy;
            summary.observe(&report, &self.policy, now);

            match self.repository.save_summary(&summary).await {
                Ok(()) => break (summary, was_unhealthy),
                Err(HealthRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        };

        let record = HealthCheckRecord::new(agent_id, &report, now);
        self.repository.append_check(&record).await?;

        let status = summary.status(&self.policy);

        if summary.consecutive_failures() >= self.policy.auto_disable_failures {
            warn!(
                agent_id = %agent_id,
                consecutive_failures = summary.consecutive_failures(),
                "disabling agent after repeated probe failures"
            );
            if let Err(err) = self.lifecycle.disable_agent(agent_id).await {
                warn!(agent_id = %agent_id, error = %err, "auto-disable failed");
            }
        }

        if !was_unhealthy && status == HealthStatus::Unhealthy {
            self.request_failover_for_sessions(agent_id).await;
        }

        Ok(RecordedCheck {
            check_id: record.id(),
            status,
            summary,
        })
    }

    /// Looks up an agent's summary, `None` before the first probe.
    ///
    /// # Errors
    ///
    /// Returns [`HealthServiceError::Repository`] when persistence fails.
    pub async fn summary(&self, agent_id: AgentId) -> HealthServiceResult<Option<HealthSummary>> {
        Ok(self.repository.find_summary(agent_id).await?)
    }

    /// Derives an agent's status; unprobed agents count as healthy.
    ///
    /// # Errors
    ///
    /// Returns [`HealthServiceError::Repository`] when persistence fails.
    pub async fn status(&self, agent_id: AgentId) -> HealthServiceResult<HealthStatus> {
        let status = self
            .repository
            .find_summary(agent_id)
            .await?
            .map_or(HealthStatus::Healthy, |summary| summary.status(&self.policy));
        Ok(status)
    }

    /// Returns the most recent checks for an agent, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`HealthServiceError::Repository`] when persistence fails.
    pub async fn recent_checks(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> HealthServiceResult<Vec<HealthCheckRecord>> {
        Ok(self.repository.recent_checks(agent_id, limit).await?)
    }

    /// Resets an agent's summary to the initial state.
    ///
    /// A no-op when the agent was never probed. Used on reactivation so a
    /// returning agent is not judged by its pre-outage record.
    ///
    /// # Errors
    ///
    /// Returns [`HealthServiceError::Repository`] when persistence fails, or
    /// [`HealthServiceError::Contention`] on exhausted retries.
    pub async fn reset(&self, agent_id: AgentId) -> HealthServiceResult<()> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(mut summary) = self.repository.find_summary(agent_id).await? else {
                return Ok(());
            };
            summary.reset(self.clock.utc());
            match self.repository.save_summary(&summary).await {
                Ok(()) => return Ok(()),
                Err(HealthRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(HealthServiceError::Contention(agent_id))
    }

    async fn request_failover_for_sessions(&self, agent_id: AgentId) {
        for session_id in self.sessions.active_sessions_owned_by(agent_id).await {
            warn!(
                agent_id = %agent_id,
                session_id = %session_id,
                "requesting failover for session on unhealthy agent"
            );
            self.failover_sink
                .request_failover(FailoverRequest {
                    session_id,
                    from_agent: agent_id,
                })
                .await;
        }
    }
}

#[async_trait]
impl<H, L, S, A, C> LifecycleObserver for HealthMonitorService<H, L, S, A, C>
where
    H: HealthRepository,
    L: AgentLifecycle,
    S: FailoverRequestSink,
    A: ActiveSessionSource,
    C: Clock + Send + Sync,
{
    async fn agent_deactivated(&self, agent_id: AgentId) {
        let _ = agent_id;
    }

    async fn agent_reactivated(&self, agent_id: AgentId) {
        if let Err(err) = self.reset(agent_id).await {
            warn!(agent_id = %agent_id, error = %err, "health reset on reactivation failed");
        }
    }
}
