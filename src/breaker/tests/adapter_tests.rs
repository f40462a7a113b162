//! Unit tests for the in-memory breaker repository.

use crate::breaker::{
    adapters::memory::InMemoryBreakerRepository,
    domain::{BreakerKey, CircuitRecord},
    ports::{BreakerRepository, BreakerRepositoryError},
};
use crate::config::BreakerPolicy;

#[tokio::test(flavor = "multi_thread")]
async fn stale_version_save_is_rejected() {
    let repository = InMemoryBreakerRepository::new();
    let key = BreakerKey::new("dispatcher", "https://agent.internal/chat").expect("valid key");
    let record = CircuitRecord::new(key.clone(), &BreakerPolicy::default());

    repository
        .save(&record)
        .await
        .expect("initial save should succeed");

    // The initial copy is now one version behind the stored record.
    let stale = repository.save(&record).await;
    assert!(matches!(
        stale,
        Err(BreakerRepositoryError::VersionConflict(conflicted)) if conflicted == key
    ));

    let fresh = repository
        .find(&key)
        .await
        .expect("lookup should succeed")
        .expect("record exists");
    assert_eq!(fresh.version(), record.version() + 1);
    repository
        .save(&fresh)
        .await
        .expect("re-read save should succeed");
}
