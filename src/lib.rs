//! Bulkhead: control plane for conversational agent pools.
//!
//! This crate tracks the health of independently-operated worker agents,
//! assigns inbound conversational sessions to them, moves live sessions away
//! from degrading agents, and contains cascading failures with a circuit
//! breaker and a retry-scheduling error ledger.
//!
//! # Architecture
//!
//! Bulkhead follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores,
//!   failover request channels)
//! - **Services**: Orchestration over ports, generic over an injected clock
//!
//! # Modules
//!
//! - [`registry`]: durable catalogue of agents (identity, endpoint, capacity,
//!   capabilities, lifecycle status, credentials)
//! - [`health`]: probe ingestion, health scoring, and automatic disablement
//! - [`routing`]: session assignment and failover coordination
//! - [`breaker`]: circuit breaker guarding outbound calls per
//!   (component, endpoint) pair
//! - [`ledger`]: failure recording with backoff-based retry scheduling
//! - [`config`]: the policy structure collecting every tunable threshold

pub mod breaker;
pub mod config;
pub mod health;
pub mod ledger;
pub mod registry;
pub mod routing;
