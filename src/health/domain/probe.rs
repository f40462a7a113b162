//! Probe results as reported by the transport layer.

use serde::{Deserialize, Serialize};

/// Binary outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The agent answered within the caller's deadline.
    Healthy,
    /// The agent failed, timed out, or answered malformed.
    Unhealthy,
}

impl ProbeOutcome {
    /// Returns `true` for a healthy outcome.
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// A single probe observation submitted to the monitor.
///
/// Timeouts and transport errors arrive here already collapsed into an
/// [`ProbeOutcome::Unhealthy`] outcome; the monitor never raises them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    outcome: ProbeOutcome,
    latency_ms: Option<u32>,
    detail: Option<String>,
}

impl ProbeReport {
    /// Creates a healthy report with the measured round-trip latency.
    #[must_use]
    pub const fn healthy(latency_ms: u32) -> Self {
        Self {
            outcome: ProbeOutcome::Healthy,
            latency_ms: Some(latency_ms),
            detail: None,
        }
    }

    /// Creates an unhealthy report with a short failure description.
    #[must_use]
    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            outcome: ProbeOutcome::Unhealthy,
            latency_ms: None,
            detail: Some(detail.into()),
        }
    }

    /// Attaches a latency measurement.
    #[must_use]
    pub const fn with_latency(mut self, latency_ms: u32) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// The probe outcome.
    #[must_use]
    pub const fn outcome(&self) -> ProbeOutcome {
        self.outcome
    }

    /// The measured latency, when available.
    #[must_use]
    pub const fn latency_ms(&self) -> Option<u32> {
        self.latency_ms
    }

    /// The failure description, when available.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
