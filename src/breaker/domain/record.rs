//! The circuit record aggregate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::breaker::domain::{BreakerKey, CircuitState};
use crate::config::BreakerPolicy;

/// Answer to a pre-call check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitDecision {
    /// The breaker state after the check was evaluated.
    pub state: CircuitState,
    /// Whether the caller may proceed with the call.
    pub can_proceed: bool,
}

/// Per-dependency breaker state.
///
/// Outcomes feed a bounded sliding window; transitions out of open happen
/// only through [`CircuitRecord::check`], which grants exactly one trial
/// once the cool-down has elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitRecord {
    key: BreakerKey,
    window: VecDeque<bool>,
    state: CircuitState,
    opened_at: Option<DateTime<Utc>>,
    cooldown_secs: u64,
    trial_inflight: bool,
    times_opened: u32,
    version: u64,
}

impl CircuitRecord {
    /// Creates a closed breaker at the base cool-down.
    #[must_use]
    pub fn new(key: BreakerKey, policy: &BreakerPolicy) -> Self {
        Self {
            key,
            window: VecDeque::new(),
            state: CircuitState::Closed,
            opened_at: None,
            cooldown_secs: policy.base_cooldown_secs,
            trial_inflight: false,
            times_opened: 0,
            version: 0,
        }
    }

    /// The guarded dependency.
    #[must_use]
    pub const fn key(&self) -> &BreakerKey {
        &self.key
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CircuitState {
        self.state
    }

    /// When the breaker last opened.
    #[must_use]
    pub const fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    /// Cool-down currently in force, in seconds.
    #[must_use]
    pub const fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    /// How often this breaker has opened over its lifetime.
    #[must_use]
    pub const fn times_opened(&self) -> u32 {
        self.times_opened
    }

    /// Failures currently in the sliding window.
    #[must_use]
    pub fn failures_in_window(&self) -> u32 {
        u32::try_from(self.window.iter().filter(|&&ok| !ok).count()).unwrap_or(u32::MAX)
    }

    /// Optimistic-concurrency version stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Feeds one call outcome into the breaker.
    ///
    /// Closed trips open once window failures reach the threshold. In
    /// half-open the outcome settles the trial: success closes the breaker
    /// and resets the cool-down, failure re-opens it with the cool-down
    /// doubled up to the policy cap. While open, outcomes only update the
    /// window.
    pub fn record_outcome(&mut self, success: bool, policy: &BreakerPolicy, now: DateTime<Utc>) {
        self.window.push_back(success);
        while self.window.len() > policy.window_size {
            self.window.pop_front();
        }

        match self.state {
            CircuitState::Closed => {
                if self.failures_in_window() >= policy.failure_threshold {
                    self.open(now);
                }
            }
            CircuitState::HalfOpen => {
                self.trial_inflight = false;
                if success {
                    self.close(policy);
                } else {
                    self.cooldown_secs =
                        (self.cooldown_secs.saturating_mul(2)).min(policy.max_cooldown_secs);
                    self.open(now);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Evaluates whether a call may proceed, advancing open to half-open
    /// once the cool-down has elapsed.
    ///
    /// The first check after the cool-down receives the single trial; later
    /// checks are refused until the trial's outcome is recorded.
    pub fn check(&mut self, now: DateTime<Utc>) -> CircuitDecision {
        match self.state {
            CircuitState::Closed => CircuitDecision {
                state: CircuitState::Closed,
                can_proceed: true,
            },
            CircuitState::Open => {
                let elapsed = self.opened_at.is_none_or(|opened| {
                    now - opened >= Duration::seconds(i64::try_from(self.cooldown_secs).unwrap_or(i64::MAX))
                });
                if elapsed {
                    self.state = CircuitState::HalfOpen;
                    self.trial_inflight = true;
                    CircuitDecision {
                        state: CircuitState::HalfOpen,
                        can_proceed: true,
                    }
                } else {
                    CircuitDecision {
                        state: CircuitState::Open,
                        can_proceed: false,
                    }
                }
            }
            CircuitState::HalfOpen => {
                if self.trial_inflight {
                    CircuitDecision {
                        state: CircuitState::HalfOpen,
                        can_proceed: false,
                    }
                } else {
                    self.trial_inflight = true;
                    CircuitDecision {
                        state: CircuitState::HalfOpen,
                        can_proceed: true,
                    }
                }
            }
        }
    }

    fn open(&mut self, now: DateTime<Utc>) {
        self.state = CircuitState::Open;
        self.opened_at = Some(now);
        self.times_opened = self.times_opened.saturating_add(1);
    }

    fn close(&mut self, policy: &BreakerPolicy) {
        self.state = CircuitState::Closed;
        self.opened_at = None;
        self.cooldown_secs = policy.base_cooldown_secs;
        self.window.clear();
    }

    pub(crate) fn advance_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
