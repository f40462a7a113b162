//! Persistence contract for circuit records.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

use crate::breaker::domain::{BreakerKey, CircuitRecord};

/// Errors surfaced by breaker persistence.
#[derive(Debug, Clone, Error)]
pub enum BreakerRepositoryError {
    /// The stored record changed since it was read.
    #[error("circuit record for {0} was modified concurrently")]
    VersionConflict(BreakerKey),

    /// The underlying store failed.
    #[error("breaker persistence failure: {0}")]
    Persistence(#[source] Arc<dyn Error + Send + Sync>),
}

impl BreakerRepositoryError {
    /// Wraps a storage failure.
    #[must_use]
    pub fn persistence(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for breaker persistence operations.
pub type BreakerRepositoryResult<T> = Result<T, BreakerRepositoryError>;

/// Store for circuit records, keyed by component and endpoint.
#[async_trait]
pub trait BreakerRepository: Send + Sync {
    /// Stores a record, creating it when absent.
    ///
    /// When a record already exists its version must match the one being
    /// written, otherwise [`BreakerRepositoryError::VersionConflict`] is
    /// returned and nothing changes.
    async fn save(&self, record: &CircuitRecord) -> BreakerRepositoryResult<()>;

    /// Looks up the record for a key.
    async fn find(&self, key: &BreakerKey) -> BreakerRepositoryResult<Option<CircuitRecord>>;
}
