//! Domain types for session routing.

mod caller;
mod error;
mod history;
mod ids;
mod selection;
mod session;
mod token;

pub use caller::CallerKey;
pub use error::RoutingDomainError;
pub use history::{Speaker, TurnRecord};
pub use ids::SessionId;
pub use selection::{Candidate, select_agent};
pub use session::{NewSessionParams, Session};
pub use token::{IntegrityToken, RouterSecret};
