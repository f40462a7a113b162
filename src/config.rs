//! Policy configuration for the control plane.
//!
//! Every numeric threshold the control plane applies lives here rather than
//! as a literal at the point of use, so the routing and containment policy
//! can be audited and tested independently of the mechanism.

use serde::{Deserialize, Serialize};

/// Complete control-plane policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ControlPolicy {
    /// Health scoring and auto-disablement thresholds.
    pub health: HealthPolicy,
    /// Circuit breaker window and cool-down settings.
    pub breaker: BreakerPolicy,
    /// Error ledger retry budgets and backoff settings.
    pub retry: RetryPolicy,
}

/// Health scoring policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPolicy {
    /// Weight given to the previous score in the exponential moving average.
    /// The probe outcome receives `1.0 - ema_weight`.
    pub ema_weight: f64,
    /// Scores at or above this value derive a `Healthy` status.
    pub healthy_threshold: f64,
    /// Scores at or above this value (but below `healthy_threshold`) derive
    /// a `Degraded` status; below it the agent is `Unhealthy`.
    pub degraded_threshold: f64,
    /// Consecutive failures at or above this count force an `Unhealthy`
    /// status regardless of score.
    pub unhealthy_consecutive_failures: u32,
    /// Consecutive failures at or above this count deactivate the agent in
    /// the registry.
    pub auto_disable_failures: u32,
    /// Number of recent latency observations folded into the rolling average.
    pub latency_window: usize,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            ema_weight: 0.7,
            healthy_threshold: 70.0,
            degraded_threshold: 50.0,
            unhealthy_consecutive_failures: 2,
            auto_disable_failures: 3,
            latency_window: 20,
        }
    }
}

/// Circuit breaker policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerPolicy {
    /// Failures within the sliding window that trip a closed breaker open.
    pub failure_threshold: u32,
    /// Number of recent outcomes retained in the sliding window.
    pub window_size: usize,
    /// Cool-down applied on the first open, in seconds.
    pub base_cooldown_secs: u64,
    /// Upper bound for the doubled cool-down, in seconds.
    pub max_cooldown_secs: u64,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            window_size: 5,
            base_cooldown_secs: 30,
            max_cooldown_secs: 600,
        }
    }
}

/// Retry scheduling policy for the error ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Backoff base, in seconds. Attempt `n` waits `base * 2^n` before the
    /// jitter is applied.
    pub base_backoff_secs: u64,
    /// Jitter applied to each delay as a symmetric fraction (0.2 = +/-20%).
    pub jitter_fraction: f64,
    /// Retry budget for high-severity errors.
    pub high_max_retries: u32,
    /// Retry budget for medium-severity errors.
    pub medium_max_retries: u32,
    /// Retry budget for low-severity errors.
    pub low_max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_backoff_secs: 5,
            jitter_fraction: 0.2,
            high_max_retries: 5,
            medium_max_retries: 3,
            low_max_retries: 1,
        }
    }
}
