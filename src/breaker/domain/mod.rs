//! Domain types for circuit breaking.

mod error;
mod key;
mod record;
mod state;

pub use error::BreakerDomainError;
pub use key::BreakerKey;
pub use record::{CircuitDecision, CircuitRecord};
pub use state::CircuitState;
