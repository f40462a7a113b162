//! Domain model for agent registration and lifecycle.
//!
//! Models validated registration metadata, capability declarations, capacity
//! limits, and the salted one-way credential each agent authenticates with.
//! All infrastructure concerns are kept outside the domain boundary.

mod capabilities;
mod capacity;
mod credential;
mod endpoint;
mod error;
mod ids;
mod kind;
mod name;
mod record;
mod status;

pub use capabilities::AgentCapabilities;
pub use capacity::SessionCapacity;
pub use credential::ApiCredential;
pub use endpoint::EndpointUrl;
pub use error::{ParseAgentKindError, ParseAgentStatusError, RegistryDomainError};
pub use ids::AgentId;
pub use kind::AgentKind;
pub use name::AgentName;
pub use record::{AgentRecord, NewAgentParams};
pub use status::AgentStatus;
