//! Unit tests for session router orchestration.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::config::HealthPolicy;
use crate::health::adapters::memory::InMemoryHealthRepository;
use crate::health::domain::{HealthSummary, ProbeReport};
use crate::health::ports::HealthRepository;
use crate::registry::{
    adapters::memory::InMemoryAgentRepository,
    domain::{AgentId, AgentKind, AgentRecord},
    services::{AgentRegistryService, RegisterAgentRequest},
};
use crate::routing::{
    adapters::memory::InMemorySessionRepository,
    domain::{RouterSecret, RoutingDomainError, SessionId, Speaker},
    services::{RoutingServiceError, SessionRouterService},
};

type TestRegistry = AgentRegistryService<InMemoryAgentRepository, DefaultClock>;
type TestRouter = SessionRouterService<
    InMemorySessionRepository,
    InMemoryAgentRepository,
    InMemoryHealthRepository,
    DefaultClock,
>;

struct Harness {
    router: TestRouter,
    registry: TestRegistry,
    health: Arc<InMemoryHealthRepository>,
}

#[fixture]
fn harness() -> Harness {
    let agents = Arc::new(InMemoryAgentRepository::new());
    let health = Arc::new(InMemoryHealthRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let registry = AgentRegistryService::new(Arc::clone(&agents), Arc::new(DefaultClock));
    let router = SessionRouterService::new(
        sessions,
        Arc::clone(&agents),
        Arc::clone(&health),
        Arc::new(DefaultClock),
        RouterSecret::generate(),
        HealthPolicy::default(),
    );
    Harness {
        router,
        registry,
        health,
    }
}

async fn register_agent(harness: &Harness, name: &str, capacity: u32) -> AgentRecord {
    harness
        .registry
        .register(
            RegisterAgentRequest::new(
                name,
                "general",
                "https://agent.internal/chat",
                "router-test-key",
            )
            .with_capacity(capacity),
        )
        .await
        .expect("registration should succeed")
}

/// Writes a summary with `failures` consecutive failed probes.
async fn seed_failures(harness: &Harness, agent_id: AgentId, failures: usize) {
    let policy = HealthPolicy::default();
    let mut summary = HealthSummary::new(agent_id, Utc::now());
    for _ in 0..failures {
        summary.observe(&ProbeReport::unhealthy("probe down"), &policy, Utc::now());
    }
    harness
        .health
        .save_summary(&summary)
        .await
        .expect("summary save should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_or_create_is_idempotent_per_caller_and_kind(harness: Harness) {
    register_agent(&harness, "solo-agent", 10).await;

    let first = harness
        .router
        .get_or_create_session("+15551234567", AgentKind::General)
        .await
        .expect("creation should succeed");
    let second = harness
        .router
        .get_or_create_session("+15551234567", AgentKind::General)
        .await
        .expect("lookup should succeed");

    assert_eq!(first.id(), second.id());
    assert_eq!(first.agent_id(), second.agent_id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn routes_to_the_healthier_agent(harness: Harness) {
    let degraded = register_agent(&harness, "degraded-agent", 10).await;
    let healthy = register_agent(&harness, "healthy-agent", 10).await;
    seed_failures(&harness, degraded.id(), 2).await;

    let session = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");

    assert_eq!(session.agent_id(), healthy.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_increments_the_owners_counter(harness: Harness) {
    let agent = register_agent(&harness, "counted-agent", 10).await;

    harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");

    let stored = harness
        .registry
        .get(agent.id())
        .await
        .expect("lookup should succeed")
        .expect("agent exists");
    assert_eq!(stored.current_sessions(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn capacity_is_a_soft_constraint(harness: Harness) {
    let only = register_agent(&harness, "tiny-agent", 1).await;

    let first = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");
    let second = harness
        .router
        .get_or_create_session("caller-b", AgentKind::General)
        .await
        .expect("fallback placement should succeed");

    assert_eq!(first.agent_id(), only.id());
    assert_eq!(second.agent_id(), only.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_agent_of_kind_is_an_error(harness: Harness) {
    register_agent(&harness, "general-agent", 10).await;

    let outcome = harness
        .router
        .get_or_create_session("caller-a", AgentKind::Mcp)
        .await;

    assert!(matches!(
        outcome,
        Err(RoutingServiceError::NoAvailableAgent(AgentKind::Mcp))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn integrity_token_verifies_only_the_issued_value(harness: Harness) {
    register_agent(&harness, "token-agent", 10).await;
    let session = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");

    let good = harness
        .router
        .verify_integrity(session.id(), session.token().as_hex())
        .await
        .expect("verification should succeed");
    let bad = harness
        .router
        .verify_integrity(session.id(), "not-the-token")
        .await
        .expect("verification should succeed");

    assert!(good);
    assert!(!bad);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_turn_appends_and_persists(harness: Harness) {
    register_agent(&harness, "chatty-agent", 10).await;
    let session = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");

    harness
        .router
        .record_turn(session.id(), Speaker::Caller, "hello")
        .await
        .expect("turn should record");
    let updated = harness
        .router
        .record_turn(session.id(), Speaker::Agent, "hi, how can I help?")
        .await
        .expect("turn should record");

    assert_eq!(updated.history().len(), 2);
    assert_eq!(updated.history()[0].content(), "hello");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_turn_on_unknown_session_is_not_found(harness: Harness) {
    let outcome = harness
        .router
        .record_turn(SessionId::new(), Speaker::Caller, "hello")
        .await;

    assert!(matches!(
        outcome,
        Err(RoutingServiceError::SessionNotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn close_session_releases_the_slot(harness: Harness) {
    let agent = register_agent(&harness, "closing-agent", 10).await;
    let session = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");

    let closed = harness
        .router
        .close_session(session.id())
        .await
        .expect("close should succeed");
    assert!(!closed.is_active());

    let stored = harness
        .registry
        .get(agent.id())
        .await
        .expect("lookup should succeed")
        .expect("agent exists");
    assert_eq!(stored.current_sessions(), 0);

    let turn = harness
        .router
        .record_turn(session.id(), Speaker::Caller, "still there?")
        .await;
    assert!(matches!(
        turn,
        Err(RoutingServiceError::Domain(RoutingDomainError::SessionClosed))
    ));

    // A new session for the same caller gets a fresh identity.
    let replacement = harness
        .router
        .get_or_create_session("caller-a", AgentKind::General)
        .await
        .expect("creation should succeed");
    assert_ne!(replacement.id(), session.id());
}
