//! Validated concurrent-session capacity.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest accepted capacity.
const MIN_CAPACITY: u32 = 1;

/// Largest accepted capacity.
const MAX_CAPACITY: u32 = 1000;

/// Capacity applied when a registration omits the field.
const DEFAULT_CAPACITY: u32 = 10;

/// Maximum concurrent sessions an agent declares it can serve.
///
/// Capacity is advisory pressure, not a hard ceiling: concurrent assignment
/// may transiently exceed it, self-correcting on the next health cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCapacity(u32);

impl SessionCapacity {
    /// Creates a validated capacity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::CapacityOutOfRange`] when the value is
    /// outside `1..=1000`.
    pub const fn new(value: u32) -> Result<Self, RegistryDomainError> {
        if value < MIN_CAPACITY || value > MAX_CAPACITY {
            return Err(RegistryDomainError::CapacityOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the capacity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for SessionCapacity {
    fn default() -> Self {
        Self(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for SessionCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
