//! Validated agent display name.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum accepted name length after trimming.
const MIN_NAME_LENGTH: usize = 3;

/// Maximum accepted name length, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Validated human-readable agent name.
///
/// Names identify agents in operator tooling and registration responses
/// (e.g. `support-triage`, `Code Review Agent`). Length is bounded; content
/// is otherwise free-form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// The input is trimmed before length validation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::AgentNameLength`] when the trimmed
    /// value is shorter than 3 or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let trimmed = value.into().trim().to_owned();
        let length = trimmed.chars().count();

        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
            return Err(RegistryDomainError::AgentNameLength(trimmed));
        }

        Ok(Self(trimmed))
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
