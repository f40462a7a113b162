//! Port contracts for the routing module.

mod repository;

pub use repository::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};
