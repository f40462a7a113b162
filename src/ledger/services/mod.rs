//! Service layer for the error ledger.

mod ledger;

pub use ledger::{AttemptReport, ErrorLedgerService, LedgerServiceError, LedgerServiceResult};
