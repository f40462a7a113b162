//! Unit tests for the routing module.

mod domain_tests;
mod service_tests;
