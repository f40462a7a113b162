//! Validated agent endpoint address.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted endpoint length, matching the storage column bound.
const MAX_ENDPOINT_LENGTH: usize = 500;

/// Validated http(s) endpoint an agent is reachable at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Creates a validated endpoint URL.
    ///
    /// The value must use an `http://` or `https://` scheme, carry a
    /// non-empty host portion, contain no whitespace, and stay under 500
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidEndpoint`] when any of the
    /// checks above fail.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let raw = value.into().trim().to_owned();

        if raw.len() >= MAX_ENDPOINT_LENGTH {
            return Err(RegistryDomainError::InvalidEndpoint(raw));
        }

        let rest = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"));

        let valid = match rest {
            Some(remainder) => {
                !remainder.is_empty()
                    && remainder
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_alphanumeric())
                    && !raw.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(RegistryDomainError::InvalidEndpoint(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
