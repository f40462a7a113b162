//! Circuit breaker orchestration.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::breaker::domain::{
    BreakerDomainError, BreakerKey, CircuitDecision, CircuitRecord, CircuitState,
};
use crate::breaker::ports::{BreakerRepository, BreakerRepositoryError};
use crate::config::BreakerPolicy;

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Service-level errors for breaker operations.
#[derive(Debug, Error)]
pub enum BreakerServiceError {
    /// Domain validation failed; no state was changed.
    #[error(transparent)]
    Domain(#[from] BreakerDomainError),

    /// Breaker persistence failed.
    #[error(transparent)]
    Repository(#[from] BreakerRepositoryError),

    /// Optimistic-concurrency retries were exhausted.
    #[error("persistent write contention on circuit {0}")]
    Contention(BreakerKey),
}

/// Result type for breaker service operations.
pub type BreakerServiceResult<T> = Result<T, BreakerServiceError>;

/// Per-dependency circuit breaking service.
///
/// Records are created lazily on first use and never deleted; an unknown
/// key checks as closed.
pub struct CircuitBreakerService<B, C>
where
    B: BreakerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<B>,
    clock: Arc<C>,
    policy: BreakerPolicy,
}

impl<B, C> CircuitBreakerService<B, C>
where
    B: BreakerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a breaker service over the given store.
    #[must_use]
    pub const fn new(repository: Arc<B>, clock: Arc<C>, policy: BreakerPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    /// Feeds one call outcome into the dependency's breaker.
    ///
    /// # Errors
    ///
    /// Returns [`BreakerServiceError::Domain`] for an invalid key, or a
    /// persistence/contention error.
    pub async fn record_event(
        &self,
        component: &str,
        endpoint: &str,
        success: bool,
    ) -> BreakerServiceResult<CircuitRecord> {
        let key = BreakerKey::new(component, endpoint)?;
        let now = self.clock.utc();

        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut record = match self.repository.find(&key).await? {
                Some(existing) => existing,
                None => CircuitRecord::new(key.clone(), &self.policy),
            };
            let before = record.state();
            record.record_outcome(success, &self.policy, now);

            match self.repository.save(&record).await {
                Ok(()) => {
                    self.trace_transition(&key, before, record.state());
                    return Ok(record);
                }
                Err(BreakerRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(BreakerServiceError::Contention(key))
    }

    /// Asks whether a call to the dependency may proceed.
    ///
    /// The transition from open to half-open happens here, never in
    /// [`Self::record_event`]; the first check after the cool-down wins the
    /// single trial slot.
    ///
    /// # Errors
    ///
    /// Returns [`BreakerServiceError::Domain`] for an invalid key, or a
    /// persistence/contention error.
    pub async fn check(
        &self,
        component: &str,
        endpoint: &str,
    ) -> BreakerServiceResult<CircuitDecision> {
        let key = BreakerKey::new(component, endpoint)?;
        let now = self.clock.utc();

        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(mut record) = self.repository.find(&key).await? else {
                return Ok(CircuitDecision {
                    state: CircuitState::Closed,
                    can_proceed: true,
                });
            };

            let before = record.state();
            let decision = record.check(now);
            if decision.state == before && !record_changed(before, decision) {
                return Ok(decision);
            }

            match self.repository.save(&record).await {
                Ok(()) => {
                    self.trace_transition(&key, before, record.state());
                    return Ok(decision);
                }
                Err(BreakerRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(BreakerServiceError::Contention(key))
    }

    /// Returns the stored record for a dependency, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BreakerServiceError::Domain`] for an invalid key, or
    /// [`BreakerServiceError::Repository`] when persistence lookup fails.
    pub async fn inspect(
        &self,
        component: &str,
        endpoint: &str,
    ) -> BreakerServiceResult<Option<CircuitRecord>> {
        let key = BreakerKey::new(component, endpoint)?;
        Ok(self.repository.find(&key).await?)
    }

    fn trace_transition(&self, key: &BreakerKey, before: CircuitState, after: CircuitState) {
        if before == after {
            return;
        }
        match after {
            CircuitState::Open => {
                warn!(circuit = %key, from = %before, "circuit opened");
            }
            CircuitState::Closed => {
                info!(circuit = %key, from = %before, "circuit closed");
            }
            CircuitState::HalfOpen => {
                info!(circuit = %key, from = %before, "circuit half-open, trial granted");
            }
        }
    }
}

/// Whether a check decision implies the record itself mutated.
///
/// Granting a trial flips the in-flight flag even when the state label
/// stays half-open, so any proceed while not closed must be persisted.
const fn record_changed(before: CircuitState, decision: CircuitDecision) -> bool {
    !matches!(before, CircuitState::Closed) && decision.can_proceed
}
