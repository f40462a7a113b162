//! Unit tests for agent registry service orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::registry::{
    adapters::memory::InMemoryAgentRepository,
    domain::{AgentId, AgentKind, AgentName, AgentRecord, AgentStatus},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult, LifecycleObserver},
    services::{AgentRegistryService, AgentUpdate, RegisterAgentRequest, RegistryServiceError},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tokio::sync::Mutex;

type TestService = AgentRegistryService<InMemoryAgentRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    AgentRegistryService::new(
        Arc::new(InMemoryAgentRepository::new()),
        Arc::new(DefaultClock),
    )
}

fn triage_request() -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        "triage-agent",
        "general",
        "https://triage.internal:8443/chat",
        "triage-api-key",
    )
    .with_capacity(5)
    .with_capabilities(["chat".to_owned(), "summarise".to_owned()])
}

fn billing_request() -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        "billing-agent",
        "specialized",
        "https://billing.internal:8443/chat",
        "billing-api-key",
    )
}

async fn register<R: AgentRepository>(
    service: &AgentRegistryService<R, DefaultClock>,
    request: RegisterAgentRequest,
) -> Result<AgentRecord, RegistryServiceError> {
    service.register(request).await
}

#[derive(Default)]
struct RecordingObserver {
    deactivated: Mutex<Vec<AgentId>>,
    reactivated: Mutex<Vec<AgentId>>,
}

#[async_trait]
impl LifecycleObserver for RecordingObserver {
    async fn agent_deactivated(&self, agent_id: AgentId) {
        self.deactivated.lock().await.push(agent_id);
    }

    async fn agent_reactivated(&self, agent_id: AgentId) {
        self.reactivated.lock().await.push(agent_id);
    }
}

/// Store wrapper that fails the next `conflicts` updates with a version
/// conflict before delegating, to exercise the service's retry loop.
struct ConflictInjectingRepository {
    inner: InMemoryAgentRepository,
    conflicts: AtomicUsize,
}

impl ConflictInjectingRepository {
    fn failing_updates(conflicts: usize) -> Self {
        Self {
            inner: InMemoryAgentRepository::new(),
            conflicts: AtomicUsize::new(conflicts),
        }
    }
}

#[async_trait]
impl AgentRepository for ConflictInjectingRepository {
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        self.inner.insert(record).await
    }

    async fn update(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        let injected = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if injected.is_ok() {
            return Err(AgentRepositoryError::VersionConflict(record.id()));
        }
        self.inner.update(record).await
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &AgentName) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.inner.find_by_name(name).await
    }

    async fn list_active_by_kind(&self, kind: AgentKind) -> AgentRepositoryResult<Vec<AgentRecord>> {
        self.inner.list_active_by_kind(kind).await
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        self.inner.list_all().await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_and_retrieve_by_id(service: TestService) {
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let found = service
        .get(created.id())
        .await
        .expect("lookup should succeed");

    assert_eq!(found, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_name_returns_the_registered_agent(service: TestService) {
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let found = service
        .find_by_name("triage-agent")
        .await
        .expect("lookup should succeed");
    let missing = service
        .find_by_name("unknown-agent")
        .await
        .expect("lookup should succeed");

    assert_eq!(found, Some(created));
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_defaults(service: TestService) {
    let created = register(&service, billing_request())
        .await
        .expect("registration should succeed");

    assert_eq!(created.status(), AgentStatus::Active);
    assert_eq!(created.capacity().get(), 10);
    assert_eq!(created.current_sessions(), 0);
    assert!(created.capabilities().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_invalid_kind(service: TestService) {
    let request = RegisterAgentRequest::new(
        "odd-agent",
        "sidecar",
        "https://odd.internal/chat",
        "key",
    );

    assert!(matches!(
        service.register(request).await,
        Err(RegistryServiceError::Domain(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_name_is_rejected(service: TestService) {
    register(&service, triage_request())
        .await
        .expect("first registration should succeed");

    let duplicate = service.register(triage_request()).await;

    assert!(matches!(
        duplicate,
        Err(RegistryServiceError::Repository(
            AgentRepositoryError::DuplicateAgentName(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credential_verification(service: TestService) {
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let good = service
        .verify_credential(created.id(), "triage-api-key")
        .await
        .expect("verification should succeed");
    let bad = service
        .verify_credential(created.id(), "wrong-key")
        .await
        .expect("verification should succeed");

    assert!(good);
    assert!(!bad);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credential_verification_requires_known_agent(service: TestService) {
    let missing = service.verify_credential(AgentId::new(), "any").await;

    assert!(matches!(
        missing,
        Err(RegistryServiceError::Repository(
            AgentRepositoryError::NotFound(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_partial_fields(service: TestService) {
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let updated = service
        .update(
            created.id(),
            AgentUpdate::new()
                .endpoint("https://triage-blue.internal:8443/chat")
                .capacity(20),
        )
        .await
        .expect("update should succeed");

    assert_eq!(
        updated.endpoint().as_str(),
        "https://triage-blue.internal:8443/chat"
    );
    assert_eq!(updated.capacity().get(), 20);
    assert_eq!(updated.name(), created.name());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_empty_payload(service: TestService) {
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let outcome = service.update(created.id(), AgentUpdate::new()).await;

    assert!(matches!(outcome, Err(RegistryServiceError::EmptyUpdate)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_taken_name(service: TestService) {
    register(&service, triage_request())
        .await
        .expect("first registration should succeed");
    let second = register(&service, billing_request())
        .await
        .expect("second registration should succeed");

    let outcome = service
        .update(second.id(), AgentUpdate::new().name("triage-agent"))
        .await;

    assert!(matches!(
        outcome,
        Err(RegistryServiceError::Repository(
            AgentRepositoryError::DuplicateAgentName(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivate_is_idempotent_and_notifies_once(service: TestService) {
    let observer = Arc::new(RecordingObserver::default());
    let service = service.with_observer(observer.clone());

    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let first = service
        .deactivate(created.id())
        .await
        .expect("deactivation should succeed");
    let second = service
        .deactivate(created.id())
        .await
        .expect("repeat deactivation should succeed");

    assert_eq!(first.status(), AgentStatus::Inactive);
    assert_eq!(second.status(), AgentStatus::Inactive);
    assert_eq!(observer.deactivated.lock().await.as_slice(), [created.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reactivation_notifies_observers(service: TestService) {
    let observer = Arc::new(RecordingObserver::default());
    let service = service.with_observer(observer.clone());

    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");
    service
        .deactivate(created.id())
        .await
        .expect("deactivation should succeed");
    let restored = service
        .activate(created.id())
        .await
        .expect("reactivation should succeed");

    assert_eq!(restored.status(), AgentStatus::Active);
    assert_eq!(observer.reactivated.lock().await.as_slice(), [created.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_active_by_kind_excludes_inactive_and_other_kinds(service: TestService) {
    let triage = register(&service, triage_request())
        .await
        .expect("first registration should succeed");
    register(&service, billing_request())
        .await
        .expect("second registration should succeed");
    let spare = register(
        &service,
        RegisterAgentRequest::new(
            "spare-agent",
            "general",
            "https://spare.internal/chat",
            "spare-key",
        ),
    )
    .await
    .expect("third registration should succeed");
    service
        .deactivate(spare.id())
        .await
        .expect("deactivation should succeed");

    let general = service
        .list_active_by_kind(AgentKind::General)
        .await
        .expect("listing should succeed");

    assert_eq!(general.len(), 1);
    assert_eq!(general[0].id(), triage.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_aggregate_over_all_agents(service: TestService) {
    let triage = register(&service, triage_request())
        .await
        .expect("first registration should succeed");
    register(&service, billing_request())
        .await
        .expect("second registration should succeed");
    service
        .deactivate(triage.id())
        .await
        .expect("deactivation should succeed");

    let stats = service.stats().await.expect("stats should succeed");

    assert_eq!(stats.active_agents, 1);
    assert_eq!(stats.inactive_agents, 1);
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.total_capacity, 15);
}

#[tokio::test(flavor = "multi_thread")]
async fn deactivate_retries_past_a_version_conflict() {
    let repository = Arc::new(ConflictInjectingRepository::failing_updates(1));
    let service = AgentRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let deactivated = service
        .deactivate(created.id())
        .await
        .expect("deactivation should retry past the conflict");

    assert_eq!(deactivated.status(), AgentStatus::Inactive);
    let stored = repository
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed")
        .expect("record exists");
    assert_eq!(stored.status(), AgentStatus::Inactive);
}

#[tokio::test(flavor = "multi_thread")]
async fn exhausted_update_retries_surface_as_contention() {
    let repository = Arc::new(ConflictInjectingRepository::failing_updates(usize::MAX));
    let service = AgentRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let created = register(&service, triage_request())
        .await
        .expect("registration should succeed");

    let outcome = service.deactivate(created.id()).await;

    assert!(matches!(
        outcome,
        Err(RegistryServiceError::Contention(id)) if id == created.id()
    ));
}
