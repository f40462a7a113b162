//! Agent registry: the durable catalogue of worker agents.
//!
//! The registry owns agent identity, endpoint, capacity, capability set, and
//! lifecycle status. Every other module holds agents by identifier only; all
//! mutation of an agent record flows through the registry service. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
