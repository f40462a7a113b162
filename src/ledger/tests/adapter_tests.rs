//! Unit tests for the in-memory ledger repository.

use chrono::{Duration, Utc};

use crate::ledger::{
    adapters::memory::InMemoryLedgerRepository,
    domain::{ErrorEntry, ErrorSeverity, NewErrorParams},
    ports::{LedgerRepository, LedgerRepositoryError},
};

fn stored_entry() -> ErrorEntry {
    ErrorEntry::new(
        NewErrorParams {
            code: "dispatch_timeout".to_owned(),
            category: "dispatch".to_owned(),
            severity: ErrorSeverity::Medium,
            message: "agent did not answer within deadline".to_owned(),
            component: "dispatcher".to_owned(),
        },
        3,
        Duration::seconds(5),
        Utc::now(),
    )
    .expect("entry is valid")
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_version_update_is_rejected() {
    let repository = InMemoryLedgerRepository::new();
    let entry = stored_entry();
    repository
        .insert(&entry)
        .await
        .expect("insert should succeed");

    repository
        .update(&entry)
        .await
        .expect("current-version update should succeed");

    let stale = repository.update(&entry).await;
    assert!(matches!(
        stale,
        Err(LedgerRepositoryError::VersionConflict(id)) if id == entry.id()
    ));

    let fresh = repository
        .find_by_id(entry.id())
        .await
        .expect("lookup should succeed")
        .expect("entry exists");
    assert_eq!(fresh.version(), entry.version() + 1);
    repository
        .update(&fresh)
        .await
        .expect("re-read update should succeed");
}
