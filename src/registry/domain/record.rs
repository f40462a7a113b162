//! Agent registration aggregate root.

use super::{
    AgentCapabilities, AgentId, AgentKind, AgentName, AgentStatus, ApiCredential, EndpointUrl,
    SessionCapacity,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a new agent record.
#[derive(Debug, Clone)]
pub struct NewAgentParams {
    /// Validated agent name.
    pub name: AgentName,
    /// Kind tag matched against session requests.
    pub kind: AgentKind,
    /// Endpoint the agent is reachable at.
    pub endpoint: EndpointUrl,
    /// Declared capability set.
    pub capabilities: AgentCapabilities,
    /// Declared concurrent-session capacity.
    pub capacity: SessionCapacity,
    /// Salted digest of the agent's API key.
    pub credential: ApiCredential,
    /// Free-form operator metadata.
    pub metadata: serde_json::Value,
}

/// Agent registration aggregate root.
///
/// Owned and mutated exclusively through the registry; the health monitor and
/// session router hold agents by [`AgentId`] only. The `current_sessions`
/// counter is advisory capacity pressure, not a hard ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    id: AgentId,
    name: AgentName,
    kind: AgentKind,
    endpoint: EndpointUrl,
    capabilities: AgentCapabilities,
    capacity: SessionCapacity,
    current_sessions: u32,
    status: AgentStatus,
    credential: ApiCredential,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    version: u64,
}

impl AgentRecord {
    /// Creates a new record with `Active` status and no sessions.
    #[must_use]
    pub fn new(params: NewAgentParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            name: params.name,
            kind: params.kind,
            endpoint: params.endpoint,
            capabilities: params.capabilities,
            capacity: params.capacity,
            current_sessions: 0,
            status: AgentStatus::Active,
            credential: params.credential,
            metadata: params.metadata,
            created_at: timestamp,
            last_seen: timestamp,
            version: 0,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Returns the endpoint address.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the declared capability set.
    #[must_use]
    pub const fn capabilities(&self) -> &AgentCapabilities {
        &self.capabilities
    }

    /// Returns the declared capacity.
    #[must_use]
    pub const fn capacity(&self) -> SessionCapacity {
        self.capacity
    }

    /// Returns the advisory count of sessions currently assigned.
    #[must_use]
    pub const fn current_sessions(&self) -> u32 {
        self.current_sessions
    }

    /// Returns `true` when the advisory session count is below capacity.
    #[must_use]
    pub const fn has_free_capacity(&self) -> bool {
        self.current_sessions < self.capacity.get()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the operator metadata.
    #[must_use]
    pub const fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-seen timestamp.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns the optimistic-concurrency stamp. The repository rejects
    /// updates whose version no longer matches the stored row.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Verifies a presented API key against the stored derivation.
    #[must_use]
    pub fn verify_credential(&self, presented_key: &str) -> bool {
        self.credential.verify(presented_key)
    }

    /// Deactivates the agent, setting status to [`AgentStatus::Inactive`].
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = AgentStatus::Inactive;
        self.touch(clock);
    }

    /// Activates the agent, setting status to [`AgentStatus::Active`].
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = AgentStatus::Active;
        self.touch(clock);
    }

    /// Replaces the agent name.
    pub fn set_name(&mut self, name: AgentName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Replaces the endpoint address.
    pub fn set_endpoint(&mut self, endpoint: EndpointUrl, clock: &impl Clock) {
        self.endpoint = endpoint;
        self.touch(clock);
    }

    /// Replaces the declared capacity.
    pub fn set_capacity(&mut self, capacity: SessionCapacity, clock: &impl Clock) {
        self.capacity = capacity;
        self.touch(clock);
    }

    /// Replaces the capability set.
    pub fn set_capabilities(&mut self, capabilities: AgentCapabilities, clock: &impl Clock) {
        self.capabilities = capabilities;
        self.touch(clock);
    }

    /// Replaces the operator metadata.
    pub fn set_metadata(&mut self, metadata: serde_json::Value, clock: &impl Clock) {
        self.metadata = metadata;
        self.touch(clock);
    }

    /// Increments the advisory session counter.
    pub fn increment_sessions(&mut self) {
        self.current_sessions = self.current_sessions.saturating_add(1);
    }

    /// Decrements the advisory session counter, stopping at zero.
    pub fn decrement_sessions(&mut self) {
        self.current_sessions = self.current_sessions.saturating_sub(1);
    }

    /// Updates the `last_seen` timestamp to the current clock time.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.last_seen = clock.utc();
    }

    pub(crate) fn advance_version(&mut self) {
        self.version += 1;
    }
}
