//! Coarse health status derived from the score and failure streak.

use serde::{Deserialize, Serialize};

/// Coarse availability classification of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Score at or above the healthy threshold, no failure streak.
    Healthy,
    /// Score between the degraded and healthy thresholds.
    Degraded,
    /// Score below the degraded threshold, or a failure streak.
    Unhealthy,
}

impl HealthStatus {
    /// Storage form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
