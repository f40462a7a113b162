//! Error severity and the retry budget it implies.

use serde::{Deserialize, Serialize};

use crate::config::RetryPolicy;

/// How urgently an error needs resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Routine failure, one retry.
    Low,
    /// Degraded functionality.
    Medium,
    /// Availability-impacting failure.
    High,
}

impl ErrorSeverity {
    /// Storage form of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Retry budget for this severity under the given policy.
    #[must_use]
    pub const fn max_retries(self, policy: &RetryPolicy) -> u32 {
        match self {
            Self::Low => policy.low_max_retries,
            Self::Medium => policy.medium_max_retries,
            Self::High => policy.high_max_retries,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
