//! Session routing and failover.
//!
//! Assigns inbound conversational sessions to the healthiest agent with
//! spare capacity, verifies session integrity tokens, and moves live
//! sessions off agents that degrade or are withdrawn.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
