//! Port contracts for the health module.

mod failover;
mod lifecycle;
mod repository;
mod sessions;

pub use failover::{FailoverRequest, FailoverRequestSink};
pub use lifecycle::{AgentLifecycle, AgentLifecycleError};
pub use repository::{HealthRepository, HealthRepositoryError, HealthRepositoryResult};
pub use sessions::ActiveSessionSource;
