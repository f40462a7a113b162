//! Exponential backoff with jitter.

use chrono::Duration;
use rand::Rng;

use crate::config::RetryPolicy;

/// Delay before retry attempt `attempt` (zero-based).
///
/// `base * 2^attempt` seconds with a symmetric jitter fraction applied, so
/// schedules for errors logged in a burst spread out instead of stampeding.
#[must_use]
pub fn backoff_delay(attempt: u32, policy: &RetryPolicy) -> Duration {
    #[allow(clippy::cast_precision_loss)]
    let base = policy.base_backoff_secs.saturating_mul(1_u64 << attempt.min(32)) as f64;
    let jitter = policy.jitter_fraction.clamp(0.0, 1.0);
    let factor = if jitter > 0.0 {
        rand::thread_rng().gen_range(1.0 - jitter..=1.0 + jitter)
    } else {
        1.0
    };
    let millis = (base * factor * 1_000.0).max(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Duration::milliseconds(millis as i64)
}
