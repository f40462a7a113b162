//! Error types for agent registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The agent name is outside the 3..=100 character range after trimming.
    #[error("agent name must be between 3 and 100 characters: '{0}'")]
    AgentNameLength(String),

    /// The endpoint is not a well-formed http(s) address under 500 characters.
    #[error("invalid endpoint url: '{0}'")]
    InvalidEndpoint(String),

    /// The declared capacity is outside `1..=1000`.
    #[error("max concurrent sessions must be between 1 and 1000, got {0}")]
    CapacityOutOfRange(u32),

    /// The agent kind is outside the allowed set.
    #[error("unknown agent kind: '{0}'")]
    UnknownKind(String),
}

/// Error returned while parsing an agent kind from storage or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent kind: {0}")]
pub struct ParseAgentKindError(pub String);

impl From<ParseAgentKindError> for RegistryDomainError {
    fn from(err: ParseAgentKindError) -> Self {
        Self::UnknownKind(err.0)
    }
}

/// Error returned while parsing agent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
