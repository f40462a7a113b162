//! Validated caller identity key.

use serde::{Deserialize, Serialize};

use crate::routing::domain::RoutingDomainError;

const MAX_CALLER_KEY_CHARS: usize = 200;

/// Opaque key identifying the party a session belongs to.
///
/// Typically a normalised phone number or account identifier; the router
/// only requires it to be non-empty and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerKey(String);

impl CallerKey {
    /// Validates and normalises a caller key.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::InvalidCallerKey`] when the trimmed key
    /// is empty or longer than 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, RoutingDomainError> {
        let trimmed = value.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(RoutingDomainError::InvalidCallerKey(
                "caller key must not be empty".to_owned(),
            ));
        }
        if trimmed.chars().count() > MAX_CALLER_KEY_CHARS {
            return Err(RoutingDomainError::InvalidCallerKey(format!(
                "caller key must be at most {MAX_CALLER_KEY_CHARS} characters"
            )));
        }
        Ok(Self(trimmed))
    }

    /// String form of the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
