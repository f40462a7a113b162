//! Unit tests for the breaker module.

mod adapter_tests;
mod domain_tests;
