//! Domain types for the error ledger.

mod backoff;
mod entry;
mod error;
mod ids;
mod severity;

pub use backoff::backoff_delay;
pub use entry::{ErrorEntry, NewErrorParams, RetryAttempt};
pub use error::LedgerDomainError;
pub use ids::ErrorId;
pub use severity::ErrorSeverity;
