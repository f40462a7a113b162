//! Breaker state machine states.

use serde::{Deserialize, Serialize};

/// Position of a breaker in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls flow freely.
    Closed,
    /// Calls are refused until the cool-down elapses.
    Open,
    /// One trial call decides whether to close or re-open.
    HalfOpen,
}

impl CircuitState {
    /// Storage form of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
