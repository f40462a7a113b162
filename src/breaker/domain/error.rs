//! Domain-level validation errors for circuit breaking.

use thiserror::Error;

/// Validation failures raised before any breaker state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakerDomainError {
    /// A breaker key part was empty.
    #[error("breaker key parts must not be empty")]
    EmptyKeyPart,
}
