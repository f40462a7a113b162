//! Unit tests for session domain types and placement ranking.

use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;

use crate::registry::domain::{
    AgentCapabilities, AgentKind, AgentName, AgentRecord, ApiCredential, EndpointUrl,
    NewAgentParams, SessionCapacity,
};
use crate::routing::domain::{
    Candidate, CallerKey, NewSessionParams, RouterSecret, RoutingDomainError, Session, Speaker,
    select_agent,
};

fn test_agent(name: &str, capacity: u32) -> AgentRecord {
    AgentRecord::new(
        NewAgentParams {
            name: AgentName::new(name).expect("valid name"),
            kind: AgentKind::General,
            endpoint: EndpointUrl::new("https://agent.internal/chat").expect("valid endpoint"),
            capabilities: AgentCapabilities::from_labels([]),
            capacity: SessionCapacity::new(capacity).expect("valid capacity"),
            credential: ApiCredential::derive("test-key"),
            metadata: serde_json::Value::Null,
        },
        &DefaultClock,
    )
}

fn test_session(agent: &AgentRecord) -> Session {
    Session::new(
        NewSessionParams {
            caller_key: CallerKey::new("caller-7").expect("valid caller key"),
            kind: AgentKind::General,
            agent_id: agent.id(),
        },
        &RouterSecret::generate(),
        &DefaultClock,
    )
}

#[rstest]
#[case("")]
#[case("   ")]
fn caller_key_rejects_blank_values(#[case] input: &str) {
    assert!(matches!(
        CallerKey::new(input),
        Err(RoutingDomainError::InvalidCallerKey(_))
    ));
}

#[test]
fn caller_key_rejects_oversized_value() {
    assert!(CallerKey::new("x".repeat(201)).is_err());
}

#[test]
fn new_session_is_active_with_empty_history() {
    let agent = test_agent("placement-target", 10);
    let session = test_session(&agent);

    assert!(session.is_active());
    assert!(!session.failover_pending());
    assert!(session.history().is_empty());
    assert_eq!(session.agent_id(), agent.id());
}

#[test]
fn record_turn_appends_in_order() {
    let agent = test_agent("history-target", 10);
    let mut session = test_session(&agent);

    session
        .record_turn(Speaker::Caller, "hello", Utc::now())
        .expect("turn should record");
    session
        .record_turn(Speaker::Agent, "hi there", Utc::now())
        .expect("turn should record");

    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[0].speaker(), Speaker::Caller);
    assert_eq!(session.history()[1].content(), "hi there");
}

#[test]
fn record_turn_rejects_blank_content_and_closed_sessions() {
    let agent = test_agent("strict-target", 10);
    let mut session = test_session(&agent);

    assert_eq!(
        session.record_turn(Speaker::Caller, "   ", Utc::now()),
        Err(RoutingDomainError::EmptyTurnContent)
    );

    session.close(Utc::now());
    assert_eq!(
        session.record_turn(Speaker::Caller, "too late", Utc::now()),
        Err(RoutingDomainError::SessionClosed)
    );
}

#[test]
fn reassign_clears_pending_flag_and_keeps_history() {
    let agent = test_agent("original-owner", 10);
    let replacement = test_agent("replacement-owner", 10);
    let mut session = test_session(&agent);
    session
        .record_turn(Speaker::Caller, "first", Utc::now())
        .expect("turn should record");
    session.mark_failover_pending();

    session.reassign(replacement.id(), Utc::now());

    assert_eq!(session.agent_id(), replacement.id());
    assert!(!session.failover_pending());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn selection_prefers_higher_score() {
    let strong = test_agent("strong-agent", 10);
    let weak = test_agent("weak-agent", 10);

    let chosen = select_agent(vec![
        Candidate {
            record: weak,
            score: 49.0,
        },
        Candidate {
            record: strong.clone(),
            score: 100.0,
        },
    ])
    .expect("a candidate exists");

    assert_eq!(chosen.id(), strong.id());
}

#[test]
fn selection_breaks_score_ties_by_fewest_sessions() {
    let idle = test_agent("idle-agent", 10);
    let mut busy = test_agent("busy-agent", 10);
    busy.increment_sessions();

    let chosen = select_agent(vec![
        Candidate {
            record: busy,
            score: 100.0,
        },
        Candidate {
            record: idle.clone(),
            score: 100.0,
        },
    ])
    .expect("a candidate exists");

    assert_eq!(chosen.id(), idle.id());
}

#[test]
fn selection_falls_back_when_everyone_is_full() {
    let mut full = test_agent("full-agent", 1);
    full.increment_sessions();

    let chosen = select_agent(vec![Candidate {
        record: full.clone(),
        score: 100.0,
    }])
    .expect("capacity is advisory");

    assert_eq!(chosen.id(), full.id());
}

#[test]
fn selection_of_empty_set_is_none() {
    assert!(select_agent(Vec::new()).is_none());
}
