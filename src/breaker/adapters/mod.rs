//! Adapter implementations of the breaker ports.

pub mod memory;
