//! Adapter implementations of the registry ports.

pub mod memory;
