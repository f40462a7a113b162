//! Unit tests for the circuit record state machine.

use chrono::{DateTime, Duration, Utc};
use rstest::{fixture, rstest};

use crate::breaker::domain::{BreakerKey, CircuitRecord, CircuitState};
use crate::config::BreakerPolicy;

#[fixture]
fn policy() -> BreakerPolicy {
    BreakerPolicy::default()
}

#[fixture]
fn record(policy: BreakerPolicy) -> CircuitRecord {
    let key = BreakerKey::new("dispatcher", "https://agent.internal/chat").expect("valid key");
    CircuitRecord::new(key, &policy)
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn trip(record: &mut CircuitRecord, policy: &BreakerPolicy, at: DateTime<Utc>) {
    for _ in 0..policy.failure_threshold {
        record.record_outcome(false, policy, at);
    }
    assert_eq!(record.state(), CircuitState::Open);
}

#[rstest]
fn new_record_is_closed_and_proceeds(mut record: CircuitRecord) {
    assert_eq!(record.state(), CircuitState::Closed);
    let decision = record.check(now());
    assert!(decision.can_proceed);
    assert_eq!(decision.state, CircuitState::Closed);
}

#[rstest]
fn five_window_failures_trip_the_breaker(mut record: CircuitRecord, policy: BreakerPolicy) {
    let at = now();
    for _ in 0..4 {
        record.record_outcome(false, &policy, at);
        assert_eq!(record.state(), CircuitState::Closed);
    }
    record.record_outcome(false, &policy, at);

    assert_eq!(record.state(), CircuitState::Open);
    assert_eq!(record.opened_at(), Some(at));
    assert_eq!(record.cooldown_secs(), policy.base_cooldown_secs);
    assert!(!record.check(at).can_proceed);
}

#[rstest]
fn successes_keep_failures_below_the_threshold(mut record: CircuitRecord, policy: BreakerPolicy) {
    let at = now();
    // Window of 5: alternating outcomes never accumulate 5 failures.
    for i in 0..20 {
        record.record_outcome(i % 2 == 0, &policy, at);
    }
    assert_eq!(record.state(), CircuitState::Closed);
}

#[rstest]
fn cooldown_elapse_grants_a_single_trial(mut record: CircuitRecord, policy: BreakerPolicy) {
    let opened = now();
    trip(&mut record, &policy, opened);

    let early = opened + Duration::seconds(29);
    assert!(!record.check(early).can_proceed);

    let due = opened + Duration::seconds(30);
    let granted = record.check(due);
    assert!(granted.can_proceed);
    assert_eq!(granted.state, CircuitState::HalfOpen);

    // Trial in flight: everyone else is refused.
    assert!(!record.check(due).can_proceed);
}

#[rstest]
fn trial_success_closes_and_resets(mut record: CircuitRecord, policy: BreakerPolicy) {
    let opened = now();
    trip(&mut record, &policy, opened);
    let due = opened + Duration::seconds(30);
    assert!(record.check(due).can_proceed);

    record.record_outcome(true, &policy, due);

    assert_eq!(record.state(), CircuitState::Closed);
    assert_eq!(record.cooldown_secs(), policy.base_cooldown_secs);
    assert_eq!(record.failures_in_window(), 0);
    assert!(record.check(due).can_proceed);
}

#[rstest]
fn trial_failure_reopens_with_doubled_cooldown(mut record: CircuitRecord, policy: BreakerPolicy) {
    let opened = now();
    trip(&mut record, &policy, opened);
    let first_due = opened + Duration::seconds(30);
    assert!(record.check(first_due).can_proceed);

    record.record_outcome(false, &policy, first_due);

    assert_eq!(record.state(), CircuitState::Open);
    assert_eq!(record.cooldown_secs(), 60);
    assert!(!record.check(first_due + Duration::seconds(30)).can_proceed);
    assert!(record.check(first_due + Duration::seconds(60)).can_proceed);
}

#[rstest]
fn cooldown_doubling_is_capped(policy: BreakerPolicy) {
    let key = BreakerKey::new("dispatcher", "https://agent.internal/chat").expect("valid key");
    let mut record = CircuitRecord::new(key, &policy);
    let mut at = now();
    trip(&mut record, &policy, at);

    // Fail every trial until the cool-down saturates.
    for _ in 0..8 {
        at += Duration::seconds(i64::try_from(record.cooldown_secs()).expect("fits"));
        assert!(record.check(at).can_proceed);
        record.record_outcome(false, &policy, at);
    }

    assert_eq!(record.cooldown_secs(), policy.max_cooldown_secs);
}

#[rstest]
fn outcomes_while_open_cause_no_transition(mut record: CircuitRecord, policy: BreakerPolicy) {
    let opened = now();
    trip(&mut record, &policy, opened);

    record.record_outcome(true, &policy, opened + Duration::seconds(1));
    record.record_outcome(false, &policy, opened + Duration::seconds(2));

    assert_eq!(record.state(), CircuitState::Open);
    assert_eq!(record.opened_at(), Some(opened));
}

#[test]
fn key_rejects_blank_parts() {
    assert!(BreakerKey::new("", "https://x").is_err());
    assert!(BreakerKey::new("dispatcher", "   ").is_err());
}
