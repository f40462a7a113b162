//! Health monitoring for registered agents.
//!
//! Folds periodic probe outcomes into a per-agent exponentially-weighted
//! score, derives a coarse status, auto-disables agents that fail repeatedly,
//! and requests failover for sessions stranded on an unhealthy agent.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
