//! Circuit breaking for calls to flaky dependencies.
//!
//! Tracks recent outcomes per (component, endpoint) pair and withholds
//! permission to call once failures dominate the window, releasing a single
//! trial after a cool-down that doubles on every re-open.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
