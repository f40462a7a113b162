//! Service layer for session routing and failover.

mod error;
mod failover;
mod observer;
mod placement;
mod router;

pub use error::{RoutingServiceError, RoutingServiceResult};
pub use failover::{FailoverCoordinator, FailoverOutcome};
pub use observer::SessionFailoverFlagger;
pub use router::SessionRouterService;
