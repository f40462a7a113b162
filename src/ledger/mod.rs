//! Error ledger with backoff-based retry scheduling.
//!
//! Operational failures are recorded as ledger entries with a severity-based
//! retry budget; an external poller asks for due entries and reports the
//! outcome of each attempt.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
