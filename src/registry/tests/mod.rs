//! Unit tests for the agent registry module.

mod adapter_tests;
mod domain_tests;
mod service_tests;
