//! Unit tests for the ledger module.

mod adapter_tests;
