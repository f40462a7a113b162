//! Domain types for agent health tracking.

mod check;
mod ids;
mod probe;
mod status;
mod summary;

pub use check::HealthCheckRecord;
pub use ids::CheckId;
pub use probe::{ProbeOutcome, ProbeReport};
pub use status::HealthStatus;
pub use summary::HealthSummary;
