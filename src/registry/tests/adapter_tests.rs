//! Unit tests for the in-memory agent repository.

use mockable::DefaultClock;

use crate::registry::{
    adapters::memory::InMemoryAgentRepository,
    domain::{
        AgentCapabilities, AgentKind, AgentName, AgentRecord, ApiCredential, EndpointUrl,
        NewAgentParams, SessionCapacity,
    },
    ports::{AgentRepository, AgentRepositoryError},
};

fn stored_agent(name: &str) -> AgentRecord {
    AgentRecord::new(
        NewAgentParams {
            name: AgentName::new(name).expect("valid name"),
            kind: AgentKind::General,
            endpoint: EndpointUrl::new("https://agent.internal/chat").expect("valid endpoint"),
            capabilities: AgentCapabilities::from_labels([]),
            capacity: SessionCapacity::default(),
            credential: ApiCredential::derive("adapter-test-key"),
            metadata: serde_json::Value::Null,
        },
        &DefaultClock,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_version_update_is_rejected() {
    let repository = InMemoryAgentRepository::new();
    let record = stored_agent("versioned-agent");
    repository
        .insert(&record)
        .await
        .expect("insert should succeed");

    // First write carries the stored version and lands.
    repository
        .update(&record)
        .await
        .expect("current-version update should succeed");

    // The same copy is now one version behind.
    let stale = repository.update(&record).await;
    assert!(matches!(
        stale,
        Err(AgentRepositoryError::VersionConflict(id)) if id == record.id()
    ));

    // A re-read copy carries the advanced version and lands again.
    let fresh = repository
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed")
        .expect("record exists");
    assert_eq!(fresh.version(), record.version() + 1);
    repository
        .update(&fresh)
        .await
        .expect("re-read update should succeed");
}
