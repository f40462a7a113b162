//! Error ledger orchestration.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RetryPolicy;
use crate::ledger::domain::{
    ErrorEntry, ErrorId, LedgerDomainError, NewErrorParams, RetryAttempt, backoff_delay,
};
use crate::ledger::ports::{LedgerRepository, LedgerRepositoryError};

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Service-level errors for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerServiceError {
    /// Domain validation or state rule failed; nothing was changed.
    #[error(transparent)]
    Domain(#[from] LedgerDomainError),

    /// Ledger persistence failed.
    #[error(transparent)]
    Repository(#[from] LedgerRepositoryError),

    /// Optimistic-concurrency retries were exhausted.
    #[error("persistent write contention on ledger entry {0}")]
    Contention(ErrorId),
}

/// Result type for ledger service operations.
pub type LedgerServiceResult<T> = Result<T, LedgerServiceError>;

/// Outcome of one retry attempt as reported by the poller.
#[derive(Debug, Clone, Default)]
pub struct AttemptReport {
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Protocol status code, when the attempt got that far.
    pub status_code: Option<u16>,
    /// Short outcome description.
    pub message: Option<String>,
    /// How long the attempt took.
    pub elapsed_ms: u64,
}

/// Error recording and retry scheduling service.
pub struct ErrorLedgerService<L, C>
where
    L: LedgerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<L>,
    clock: Arc<C>,
    policy: RetryPolicy,
}

impl<L, C> ErrorLedgerService<L, C>
where
    L: LedgerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a ledger service over the given store.
    #[must_use]
    pub const fn new(repository: Arc<L>, clock: Arc<C>, policy: RetryPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    /// Records a new operational failure and schedules its first retry.
    ///
    /// The retry budget is fixed at creation from the severity; the first
    /// attempt is due one base backoff (with jitter) from now.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Domain`] when a required field is
    /// blank, or [`LedgerServiceError::Repository`] when persistence fails.
    pub async fn log_error(&self, params: NewErrorParams) -> LedgerServiceResult<ErrorEntry> {
        let now = self.clock.utc();
        let severity = params.severity;
        let max_retries = severity.max_retries(&self.policy);
        let entry = ErrorEntry::new(params, max_retries, backoff_delay(0, &self.policy), now)?;
        self.repository.insert(&entry).await?;

        info!(
            error_id = %entry.id(),
            code = entry.code(),
            severity = %severity,
            component = entry.component(),
            "error recorded"
        );
        Ok(entry)
    }

    /// Reports the outcome of one retry attempt.
    ///
    /// Success resolves the entry; failure consumes one retry and, while
    /// budget remains, reschedules with the next backoff step. Attempts
    /// against terminal entries are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Domain`] with
    /// [`LedgerDomainError::TerminalEntry`] for a terminal entry,
    /// [`LedgerRepositoryError::NotFound`] for an unknown id, or a
    /// contention error.
    pub async fn record_retry_attempt(
        &self,
        id: ErrorId,
        report: AttemptReport,
    ) -> LedgerServiceResult<ErrorEntry> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut entry = self
                .repository
                .find_by_id(id)
                .await?
                .ok_or(LedgerRepositoryError::NotFound(id))?;

            let now = self.clock.utc();
            let attempt = RetryAttempt::new(
                report.success,
                report.status_code,
                report.message.clone(),
                report.elapsed_ms,
                now,
            );
            let next_delay = backoff_delay(entry.retry_count().saturating_add(1), &self.policy);
            entry.record_attempt(attempt, next_delay, now)?;

            match self.repository.update(&entry).await {
                Ok(()) => {
                    if entry.is_terminal() && !entry.is_resolved() {
                        warn!(
                            error_id = %id,
                            code = entry.code(),
                            retries = entry.retry_count(),
                            "retry budget exhausted; entry failed terminally"
                        );
                    }
                    return Ok(entry);
                }
                Err(LedgerRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerServiceError::Contention(id))
    }

    /// Entries whose scheduled retry time has arrived, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn due_for_retry(&self) -> LedgerServiceResult<Vec<ErrorEntry>> {
        Ok(self.repository.due_for_retry(self.clock.utc()).await?)
    }

    /// Looks up an entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn get(&self, id: ErrorId) -> LedgerServiceResult<Option<ErrorEntry>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Unresolved, non-terminal entries.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_open(&self) -> LedgerServiceResult<Vec<ErrorEntry>> {
        Ok(self.repository.list_open().await?)
    }
}
