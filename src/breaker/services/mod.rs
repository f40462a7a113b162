//! Service layer for circuit breaking.

mod breaker;

pub use breaker::{BreakerServiceError, BreakerServiceResult, CircuitBreakerService};
