//! Persistence contract for ledger entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

use crate::ledger::domain::{ErrorEntry, ErrorId};

/// Errors surfaced by ledger persistence.
#[derive(Debug, Clone, Error)]
pub enum LedgerRepositoryError {
    /// No entry exists with the given identifier.
    #[error("ledger entry {0} not found")]
    NotFound(ErrorId),

    /// The entry already exists.
    #[error("ledger entry {0} already exists")]
    DuplicateEntry(ErrorId),

    /// The stored entry changed since it was read.
    #[error("ledger entry {0} was modified concurrently")]
    VersionConflict(ErrorId),

    /// The underlying store failed.
    #[error("ledger persistence failure: {0}")]
    Persistence(#[source] Arc<dyn Error + Send + Sync>),
}

impl LedgerRepositoryError {
    /// Wraps a storage failure.
    #[must_use]
    pub fn persistence(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for ledger persistence operations.
pub type LedgerRepositoryResult<T> = Result<T, LedgerRepositoryError>;

/// Store for ledger entries.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Inserts a new entry.
    async fn insert(&self, entry: &ErrorEntry) -> LedgerRepositoryResult<()>;

    /// Stores an updated entry.
    ///
    /// The stored version must match the one being written, otherwise
    /// [`LedgerRepositoryError::VersionConflict`] is returned and nothing
    /// changes.
    async fn update(&self, entry: &ErrorEntry) -> LedgerRepositoryResult<()>;

    /// Looks up an entry by id.
    async fn find_by_id(&self, id: ErrorId) -> LedgerRepositoryResult<Option<ErrorEntry>>;

    /// Entries whose scheduled retry time has arrived, soonest first.
    async fn due_for_retry(&self, now: DateTime<Utc>) -> LedgerRepositoryResult<Vec<ErrorEntry>>;

    /// Unresolved, non-terminal entries.
    async fn list_open(&self) -> LedgerRepositoryResult<Vec<ErrorEntry>>;
}
