//! Orchestration services for the agent registry.

mod registry;

pub use registry::{
    AgentRegistryService, AgentUpdate, RegisterAgentRequest, RegistryServiceError,
    RegistryServiceResult, RegistryStats,
};
