//! Port contracts for the breaker module.

mod repository;

pub use repository::{BreakerRepository, BreakerRepositoryError, BreakerRepositoryResult};
