//! Port contracts for the agent registry.

pub mod observer;
pub mod repository;

pub use observer::LifecycleObserver;
pub use repository::{AgentRepository, AgentRepositoryError, AgentRepositoryResult};
