//! Service layer for health monitoring.

mod monitor;

pub use monitor::{HealthMonitorService, HealthServiceError, HealthServiceResult, RecordedCheck};
