//! Adapter implementations of the health ports.

pub mod channel;
pub mod memory;
