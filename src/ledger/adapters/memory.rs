//! In-memory ledger store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ledger::{
    domain::{ErrorEntry, ErrorId},
    ports::{LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult},
};

/// Thread-safe in-memory ledger repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerRepository {
    entries: Arc<RwLock<HashMap<ErrorId, ErrorEntry>>>,
}

impl InMemoryLedgerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> LedgerRepositoryError {
    LedgerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn insert(&self, entry: &ErrorEntry) -> LedgerRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.contains_key(&entry.id()) {
            return Err(LedgerRepositoryError::DuplicateEntry(entry.id()));
        }
        entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &ErrorEntry) -> LedgerRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        let stored = entries
            .get(&entry.id())
            .ok_or(LedgerRepositoryError::NotFound(entry.id()))?;
        if stored.version() != entry.version() {
            return Err(LedgerRepositoryError::VersionConflict(entry.id()));
        }

        let mut next = entry.clone();
        next.advance_version();
        entries.insert(next.id(), next);
        Ok(())
    }

    async fn find_by_id(&self, id: ErrorId) -> LedgerRepositoryResult<Option<ErrorEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(&id).cloned())
    }

    async fn due_for_retry(&self, now: DateTime<Utc>) -> LedgerRepositoryResult<Vec<ErrorEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        let mut due: Vec<ErrorEntry> = entries
            .values()
            .filter(|entry| entry.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(ErrorEntry::next_retry_at);
        Ok(due)
    }

    async fn list_open(&self) -> LedgerRepositoryResult<Vec<ErrorEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .values()
            .filter(|entry| !entry.is_terminal())
            .cloned()
            .collect())
    }
}
