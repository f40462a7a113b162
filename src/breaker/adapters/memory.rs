//! In-memory circuit record store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::breaker::{
    domain::{BreakerKey, CircuitRecord},
    ports::{BreakerRepository, BreakerRepositoryError, BreakerRepositoryResult},
};

/// Thread-safe in-memory breaker repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBreakerRepository {
    records: Arc<RwLock<HashMap<BreakerKey, CircuitRecord>>>,
}

impl InMemoryBreakerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> BreakerRepositoryError {
    BreakerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BreakerRepository for InMemoryBreakerRepository {
    async fn save(&self, record: &CircuitRecord) -> BreakerRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;

        if let Some(stored) = records.get(record.key())
            && stored.version() != record.version()
        {
            return Err(BreakerRepositoryError::VersionConflict(record.key().clone()));
        }

        let mut next = record.clone();
        next.advance_version();
        records.insert(next.key().clone(), next);
        Ok(())
    }

    async fn find(&self, key: &BreakerKey) -> BreakerRepositoryResult<Option<CircuitRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(key).cloned())
    }
}
