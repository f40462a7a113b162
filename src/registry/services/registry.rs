//! Service layer for agent registration and lifecycle.
//!
//! Provides [`AgentRegistryService`] which coordinates registration,
//! credential verification, partial updates, and lifecycle transitions, and
//! fans lifecycle changes out to registered observers.

use crate::registry::{
    domain::{
        AgentCapabilities, AgentId, AgentKind, AgentName, AgentRecord, AgentStatus, ApiCredential,
        EndpointUrl, NewAgentParams, RegistryDomainError, SessionCapacity,
    },
    ports::{AgentRepository, AgentRepositoryError, LifecycleObserver},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Bounded retry budget for optimistic-concurrency conflicts.
const MAX_CAS_ATTEMPTS: usize = 5;

/// Request payload for registering a new agent.
#[derive(Debug, Clone)]
pub struct RegisterAgentRequest {
    name: String,
    kind: String,
    endpoint: String,
    presented_key: String,
    capacity: Option<u32>,
    capabilities: Vec<String>,
    metadata: serde_json::Value,
}

impl RegisterAgentRequest {
    /// Creates a request with the mandatory registration fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        endpoint: impl Into<String>,
        presented_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            endpoint: endpoint.into(),
            presented_key: presented_key.into(),
            capacity: None,
            capabilities: Vec::new(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Sets the declared concurrent-session capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the declared capability labels.
    #[must_use]
    pub fn with_capabilities(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = labels.into_iter().collect();
        self
    }

    /// Sets free-form operator metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Partial update applied to an existing agent.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    name: Option<String>,
    endpoint: Option<String>,
    capacity: Option<u32>,
    capabilities: Option<Vec<String>>,
    metadata: Option<serde_json::Value>,
}

impl AgentUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the agent name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the endpoint address.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Replaces the declared capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Replaces the capability labels.
    #[must_use]
    pub fn capabilities(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = Some(labels.into_iter().collect());
        self
    }

    /// Replaces the operator metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.endpoint.is_none()
            && self.capacity.is_none()
            && self.capabilities.is_none()
            && self.metadata.is_none()
    }
}

/// Aggregate statistics over the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Number of agents with `Active` status.
    pub active_agents: usize,
    /// Number of agents with `Inactive` status.
    pub inactive_agents: usize,
    /// Sum of advisory session counters across all agents.
    pub total_sessions: u64,
    /// Sum of declared capacities across all agents.
    pub total_capacity: u64,
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum RegistryServiceError {
    /// Domain validation failed; no state was changed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),

    /// An update request carried no updatable field.
    #[error("update must provide at least one field")]
    EmptyUpdate,

    /// Optimistic-concurrency retries were exhausted.
    #[error("persistent write contention on agent {0}")]
    Contention(AgentId),
}

/// Result type for registry service operations.
pub type RegistryServiceResult<T> = Result<T, RegistryServiceError>;

/// Agent registration and lifecycle orchestration service.
pub struct AgentRegistryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl<R, C> AgentRegistryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new registry service with no lifecycle observers.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            observers: Vec::new(),
        }
    }

    /// Registers a lifecycle observer. Observers are notified after a status
    /// change is persisted; failures are logged, never propagated.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Registers a new agent.
    ///
    /// Only a salted one-way derivation of `presented_key` is stored; the
    /// caller keeps the plaintext key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] when the name, kind,
    /// endpoint, or capacity fail validation, or
    /// [`RegistryServiceError::Repository`] when persistence rejects the
    /// record.
    pub async fn register(
        &self,
        request: RegisterAgentRequest,
    ) -> RegistryServiceResult<AgentRecord> {
        let RegisterAgentRequest {
            name,
            kind,
            endpoint,
            presented_key,
            capacity,
            capabilities,
            metadata,
        } = request;

        let name = AgentName::new(name)?;
        let kind = AgentKind::try_from(kind.as_str()).map_err(RegistryDomainError::from)?;
        let endpoint = EndpointUrl::new(endpoint)?;
        let capacity = match capacity {
            Some(value) => SessionCapacity::new(value)?,
            None => SessionCapacity::default(),
        };
        let capabilities = AgentCapabilities::from_labels(capabilities);
        let credential = ApiCredential::derive(&presented_key);

        let record = AgentRecord::new(
            NewAgentParams {
                name,
                kind,
                endpoint,
                capabilities,
                capacity,
                credential,
                metadata,
            },
            &*self.clock,
        );
        self.repository.insert(&record).await?;

        info!(agent_id = %record.id(), name = %record.name(), kind = %record.kind(), "agent registered");
        Ok(record)
    }

    /// Finds an agent by identifier.
    ///
    /// Returns `Ok(None)` when no agent has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn get(&self, id: AgentId) -> RegistryServiceResult<Option<AgentRecord>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds an agent by unique name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] when the name fails
    /// validation, or [`RegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn find_by_name(&self, name: &str) -> RegistryServiceResult<Option<AgentRecord>> {
        let name = AgentName::new(name)?;
        Ok(self.repository.find_by_name(&name).await?)
    }

    /// Returns all active agents of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_active_by_kind(
        &self,
        kind: AgentKind,
    ) -> RegistryServiceResult<Vec<AgentRecord>> {
        Ok(self.repository.list_active_by_kind(kind).await?)
    }

    /// Verifies a presented API key against the stored derivation.
    ///
    /// The comparison is constant-time; a mismatch carries no detail beyond
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    pub async fn verify_credential(
        &self,
        id: AgentId,
        presented_key: &str,
    ) -> RegistryServiceResult<bool> {
        let record = self.find_or_error(id).await?;
        Ok(record.verify_credential(presented_key))
    }

    /// Applies a partial update to an agent, touching its last-seen stamp.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::EmptyUpdate`] when no field is set,
    /// [`RegistryServiceError::Domain`] when a field fails validation, or a
    /// repository error when the agent is unknown or contended.
    pub async fn update(&self, id: AgentId, update: AgentUpdate) -> RegistryServiceResult<AgentRecord> {
        if update.is_empty() {
            return Err(RegistryServiceError::EmptyUpdate);
        }

        // Validate once, outside the retry loop, so conflicts never repeat
        // validation side effects.
        let name = update.name.map(AgentName::new).transpose()?;
        let endpoint = update.endpoint.map(EndpointUrl::new).transpose()?;
        let capacity = update.capacity.map(SessionCapacity::new).transpose()?;
        let capabilities = update.capabilities.map(AgentCapabilities::from_labels);
        let metadata = update.metadata;

        let (record, _) = self
            .mutate(id, |record| {
                if let Some(name) = name.clone() {
                    record.set_name(name, &*self.clock);
                }
                if let Some(endpoint) = endpoint.clone() {
                    record.set_endpoint(endpoint, &*self.clock);
                }
                if let Some(capacity) = capacity {
                    record.set_capacity(capacity, &*self.clock);
                }
                if let Some(capabilities) = capabilities.clone() {
                    record.set_capabilities(capabilities, &*self.clock);
                }
                if let Some(metadata) = metadata.clone() {
                    record.set_metadata(metadata, &*self.clock);
                }
                record.touch(&*self.clock);
                true
            })
            .await?;
        Ok(record)
    }

    /// Deactivates an agent.
    ///
    /// Idempotent: deactivating an already-inactive agent is a no-op and
    /// does not re-notify observers. On a real transition, observers are
    /// notified so the session store can flag the agent's live sessions for
    /// failover.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the agent is unknown or contended.
    pub async fn deactivate(&self, id: AgentId) -> RegistryServiceResult<AgentRecord> {
        let (record, changed) = self
            .mutate(id, |record| {
                if record.status() == AgentStatus::Inactive {
                    return false;
                }
                record.deactivate(&*self.clock);
                true
            })
            .await?;

        if changed {
            warn!(agent_id = %id, "agent deactivated");
            for observer in &self.observers {
                observer.agent_deactivated(id).await;
            }
        }
        Ok(record)
    }

    /// Reactivates an agent.
    ///
    /// Observers are notified on a real transition so the health store can
    /// reset the agent's summary rather than carry stale failure counts.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the agent is unknown or contended.
    pub async fn activate(&self, id: AgentId) -> RegistryServiceResult<AgentRecord> {
        let (record, changed) = self
            .mutate(id, |record| {
                if record.status() == AgentStatus::Active {
                    return false;
                }
                record.activate(&*self.clock);
                true
            })
            .await?;

        if changed {
            info!(agent_id = %id, "agent reactivated");
            for observer in &self.observers {
                observer.agent_reactivated(id).await;
            }
        }
        Ok(record)
    }

    /// Computes aggregate statistics over the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn stats(&self) -> RegistryServiceResult<RegistryStats> {
        let mut stats = RegistryStats::default();
        for record in self.repository.list_all().await? {
            match record.status() {
                AgentStatus::Active => stats.active_agents += 1,
                AgentStatus::Inactive => stats.inactive_agents += 1,
            }
            stats.total_sessions += u64::from(record.current_sessions());
            stats.total_capacity += u64::from(record.capacity().get());
        }
        Ok(stats)
    }

    async fn find_or_error(&self, id: AgentId) -> RegistryServiceResult<AgentRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }

    /// Fetch-mutate-store cycle retried on version conflicts.
    ///
    /// `apply` returns `false` for a no-op; the fetched record is returned
    /// unchanged and nothing is written.
    async fn mutate<F>(
        &self,
        id: AgentId,
        mut apply: F,
    ) -> RegistryServiceResult<(AgentRecord, bool)>
    where
        F: FnMut(&mut AgentRecord) -> bool,
    {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut record = self.find_or_error(id).await?;
            if !apply(&mut record) {
                return Ok((record, false));
            }
            match self.repository.update(&record).await {
                Ok(()) => return Ok((record, true)),
                Err(AgentRepositoryError::VersionConflict(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(RegistryServiceError::Contention(id))
    }
}
