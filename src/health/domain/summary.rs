//! Per-agent health summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::HealthPolicy;
use crate::health::domain::{HealthStatus, ProbeReport};
use crate::registry::domain::AgentId;

/// Score assigned before the first observation is applied.
const INITIAL_SCORE: f64 = 100.0;

/// Rolling health summary for one agent.
///
/// Created lazily on the first probe result. The score is an exponential
/// moving average over probe outcomes, clamped to `[0, 100]`; a short
/// failure streak forces the derived status to unhealthy even while the
/// average is still recovering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    agent_id: AgentId,
    score: f64,
    latency_window: VecDeque<u32>,
    consecutive_failures: u32,
    checks_recorded: u64,
    last_checked: DateTime<Utc>,
    version: u64,
}

impl HealthSummary {
    /// Creates a fresh summary at the initial score.
    #[must_use]
    pub fn new(agent_id: AgentId, now: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            score: INITIAL_SCORE,
            latency_window: VecDeque::new(),
            consecutive_failures: 0,
            checks_recorded: 0,
            last_checked: now,
            version: 0,
        }
    }

    /// The agent this summary describes.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Current score in `[0, 100]`.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Length of the current failure streak.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Total observations folded into this summary since creation or reset.
    #[must_use]
    pub const fn checks_recorded(&self) -> u64 {
        self.checks_recorded
    }

    /// Timestamp of the most recent observation.
    #[must_use]
    pub const fn last_checked(&self) -> DateTime<Utc> {
        self.last_checked
    }

    /// Optimistic-concurrency version stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Average latency over the rolling window, when any was measured.
    #[must_use]
    pub fn average_latency_ms(&self) -> Option<f64> {
        if self.latency_window.is_empty() {
            return None;
        }
        let total: u64 = self.latency_window.iter().map(|&ms| u64::from(ms)).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(total as f64 / self.latency_window.len() as f64)
    }

    /// Derives the coarse status under the given policy.
    #[must_use]
    pub fn status(&self, policy: &HealthPolicy) -> HealthStatus {
        if self.score < policy.degraded_threshold
            || self.consecutive_failures >= policy.unhealthy_consecutive_failures
        {
            HealthStatus::Unhealthy
        } else if self.score < policy.healthy_threshold {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Folds one probe observation into the summary.
    pub fn observe(&mut self, report: &ProbeReport, policy: &HealthPolicy, now: DateTime<Utc>) {
        let sample = if report.outcome().is_healthy() {
            100.0
        } else {
            0.0
        };
        self.score =
            (self.score * policy.ema_weight + sample * (1.0 - policy.ema_weight)).clamp(0.0, 100.0);

        if report.outcome().is_healthy() {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        }

        if let Some(latency_ms) = report.latency_ms() {
            self.latency_window.push_back(latency_ms);
            while self.latency_window.len() > policy.latency_window {
                self.latency_window.pop_front();
            }
        }

        self.checks_recorded = self.checks_recorded.saturating_add(1);
        self.last_checked = now;
    }

    /// Restores the summary to its initial state, keeping the version stamp.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.score = INITIAL_SCORE;
        self.latency_window.clear();
        self.consecutive_failures = 0;
        self.checks_recorded = 0;
        self.last_checked = now;
    }

    pub(crate) fn advance_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
