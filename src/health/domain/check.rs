//! Persisted record of an individual probe result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::domain::{CheckId, ProbeOutcome, ProbeReport};
use crate::registry::domain::AgentId;

/// One probe result as stored in the per-agent check log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckRecord {
    id: CheckId,
    agent_id: AgentId,
    outcome: ProbeOutcome,
    latency_ms: Option<u32>,
    detail: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl HealthCheckRecord {
    /// Builds a log record from a submitted report.
    #[must_use]
    pub fn new(agent_id: AgentId, report: &ProbeReport, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: CheckId::new(),
            agent_id,
            outcome: report.outcome(),
            latency_ms: report.latency_ms(),
            detail: report.detail().map(str::to_owned),
            recorded_at,
        }
    }

    /// Unique identifier of this check.
    #[must_use]
    pub const fn id(&self) -> CheckId {
        self.id
    }

    /// The probed agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// The probe outcome.
    #[must_use]
    pub const fn outcome(&self) -> ProbeOutcome {
        self.outcome
    }

    /// Measured latency, when available.
    #[must_use]
    pub const fn latency_ms(&self) -> Option<u32> {
        self.latency_ms
    }

    /// Failure description, when available.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// When the check was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
