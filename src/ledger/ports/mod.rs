//! Port contracts for the ledger module.

mod repository;

pub use repository::{LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult};
