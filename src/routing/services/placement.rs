//! Shared health- and capacity-aware placement logic.

use std::sync::Arc;

use crate::config::HealthPolicy;
use crate::health::domain::HealthStatus;
use crate::health::ports::HealthRepository;
use crate::registry::domain::{AgentId, AgentKind, AgentRecord};
use crate::registry::ports::AgentRepository;
use crate::routing::domain::{Candidate, select_agent};
use crate::routing::services::RoutingServiceResult;

/// Score assumed for agents that have never been probed.
const UNPROBED_SCORE: f64 = 100.0;

/// Candidate assembly and ranking shared by the router and the failover
/// coordinator.
pub(crate) struct PlacementEngine<R, H>
where
    R: AgentRepository,
    H: HealthRepository,
{
    agents: Arc<R>,
    health: Arc<H>,
    policy: HealthPolicy,
}

impl<R, H> PlacementEngine<R, H>
where
    R: AgentRepository,
    H: HealthRepository,
{
    pub(crate) const fn new(agents: Arc<R>, health: Arc<H>, policy: HealthPolicy) -> Self {
        Self {
            agents,
            health,
            policy,
        }
    }

    /// Picks the best active agent of `kind`, skipping `exclude` and,
    /// optionally, agents currently judged unhealthy.
    pub(crate) async fn place(
        &self,
        kind: AgentKind,
        exclude: &[AgentId],
        skip_unhealthy: bool,
    ) -> RoutingServiceResult<Option<AgentRecord>> {
        let mut candidates = Vec::new();
        for record in self.agents.list_active_by_kind(kind).await? {
            if exclude.contains(&record.id()) {
                continue;
            }
            let summary = self.health.find_summary(record.id()).await?;
            if skip_unhealthy
                && summary
                    .as_ref()
                    .is_some_and(|s| s.status(&self.policy) == HealthStatus::Unhealthy)
            {
                continue;
            }
            let score = summary.as_ref().map_or(UNPROBED_SCORE, |s| s.score());
            candidates.push(Candidate { record, score });
        }
        Ok(select_agent(candidates))
    }

    /// Whether the agent is currently judged unhealthy; unprobed agents are
    /// not.
    pub(crate) async fn is_unhealthy(&self, agent_id: AgentId) -> RoutingServiceResult<bool> {
        let unhealthy = self
            .health
            .find_summary(agent_id)
            .await?
            .is_some_and(|summary| summary.status(&self.policy) == HealthStatus::Unhealthy);
        Ok(unhealthy)
    }
}
