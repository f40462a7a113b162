//! The ledger entry aggregate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::domain::{ErrorId, ErrorSeverity, LedgerDomainError};

/// One recorded attempt against a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryAttempt {
    success: bool,
    status_code: Option<u16>,
    message: Option<String>,
    elapsed_ms: u64,
    at: DateTime<Utc>,
}

impl RetryAttempt {
    /// Builds an attempt record.
    #[must_use]
    pub fn new(
        success: bool,
        status_code: Option<u16>,
        message: Option<String>,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            success,
            status_code,
            message,
            elapsed_ms,
            at,
        }
    }

    /// Whether the attempt succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Protocol status code, when the attempt got that far.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Short outcome description.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// How long the attempt took.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// When the attempt was recorded.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Construction parameters for a new entry.
#[derive(Debug, Clone)]
pub struct NewErrorParams {
    /// Machine-readable error code.
    pub code: String,
    /// Broad classification, e.g. `dispatch` or `storage`.
    pub category: String,
    /// Severity, which fixes the retry budget.
    pub severity: ErrorSeverity,
    /// Human-readable description.
    pub message: String,
    /// The component that raised the error.
    pub component: String,
}

/// One operational failure and its retry lifecycle.
///
/// An entry is terminal once resolved or once its retry budget is spent;
/// terminal entries reject further attempts and are never rescheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    id: ErrorId,
    code: String,
    category: String,
    severity: ErrorSeverity,
    message: String,
    component: String,
    retry_count: u32,
    max_retries: u32,
    next_retry_at: Option<DateTime<Utc>>,
    resolved: bool,
    attempts: Vec<RetryAttempt>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl ErrorEntry {
    /// Creates an entry with its first retry already scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyField`] when the code, category,
    /// message, or component is blank.
    pub fn new(
        params: NewErrorParams,
        max_retries: u32,
        first_delay: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, LedgerDomainError> {
        let NewErrorParams {
            code,
            category,
            severity,
            message,
            component,
        } = params;
        for (label, value) in [
            ("code", &code),
            ("category", &category),
            ("message", &message),
            ("component", &component),
        ] {
            if value.trim().is_empty() {
                return Err(LedgerDomainError::EmptyField(label));
            }
        }

        Ok(Self {
            id: ErrorId::new(),
            code,
            category,
            severity,
            message,
            component,
            retry_count: 0,
            max_retries,
            next_retry_at: Some(now + first_delay),
            resolved: false,
            attempts: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Unique entry identifier.
    #[must_use]
    pub const fn id(&self) -> ErrorId {
        self.id
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Broad classification.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Severity of the error.
    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The component that raised the error.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Failed attempts so far.
    #[must_use]
    pub const fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Retry budget fixed at creation from the severity.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// When the next retry is due, if one is scheduled.
    #[must_use]
    pub const fn next_retry_at(&self) -> Option<DateTime<Utc>> {
        self.next_retry_at
    }

    /// Whether the error was resolved by a successful attempt.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Whether the entry accepts no further attempts.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.resolved || self.retry_count >= self.max_retries
    }

    /// The attempt log, oldest first.
    #[must_use]
    pub fn attempts(&self) -> &[RetryAttempt] {
        &self.attempts
    }

    /// When the entry was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entry last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Optimistic-concurrency version stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Whether the entry is due for a retry at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_terminal() && self.next_retry_at.is_some_and(|due| due <= now)
    }

    /// Folds one attempt outcome into the entry.
    ///
    /// Success resolves the entry and cancels scheduling. Failure consumes
    /// one retry; while budget remains the next attempt is scheduled
    /// `next_delay` from `now`, otherwise the entry fails terminally with
    /// no next retry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::TerminalEntry`] when the entry is
    /// already terminal; the attempt is not recorded.
    pub fn record_attempt(
        &mut self,
        attempt: RetryAttempt,
        next_delay: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerDomainError> {
        if self.is_terminal() {
            return Err(LedgerDomainError::TerminalEntry);
        }

        let success = attempt.success();
        self.attempts.push(attempt);
        self.updated_at = now;

        if success {
            self.resolved = true;
            self.next_retry_at = None;
            return Ok(());
        }

        self.retry_count = self.retry_count.saturating_add(1);
        if self.retry_count >= self.max_retries {
            self.next_retry_at = None;
        } else {
            self.next_retry_at = Some(now + next_delay);
        }
        Ok(())
    }

    pub(crate) fn advance_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
