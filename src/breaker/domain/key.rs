//! Breaker identity.

use serde::{Deserialize, Serialize};

use crate::breaker::domain::BreakerDomainError;

/// Identifies one guarded dependency: a component and the endpoint it calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakerKey {
    component: String,
    endpoint: String,
}

impl BreakerKey {
    /// Validates and builds a breaker key.
    ///
    /// # Errors
    ///
    /// Returns [`BreakerDomainError::EmptyKeyPart`] when either trimmed part
    /// is empty.
    pub fn new(
        component: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, BreakerDomainError> {
        let component = component.into().trim().to_owned();
        let endpoint = endpoint.into().trim().to_owned();
        if component.is_empty() || endpoint.is_empty() {
            return Err(BreakerDomainError::EmptyKeyPart);
        }
        Ok(Self {
            component,
            endpoint,
        })
    }

    /// The calling component.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The guarded endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Display for BreakerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.component, self.endpoint)
    }
}
