//! Domain-level errors for the ledger.

use thiserror::Error;

/// Validation and state errors raised before any ledger state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerDomainError {
    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The entry is resolved or has exhausted its retry budget.
    #[error("entry is terminal; no further attempts are accepted")]
    TerminalEntry,
}
