//! Domain-level validation errors for routing.

use thiserror::Error;

/// Validation failures raised before any routing state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingDomainError {
    /// The caller key is empty or oversized.
    #[error("invalid caller key: {0}")]
    InvalidCallerKey(String),

    /// A conversation turn carried no content.
    #[error("turn content must not be empty")]
    EmptyTurnContent,

    /// The session is no longer active.
    #[error("session is closed")]
    SessionClosed,
}
