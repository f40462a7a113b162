//! Unit tests for agent registry domain validation.

use rstest::rstest;

use crate::registry::domain::{
    AgentCapabilities, AgentKind, AgentName, AgentStatus, ApiCredential, EndpointUrl,
    RegistryDomainError, SessionCapacity,
};

#[rstest]
#[case("abc")]
#[case("Support Triage Agent")]
fn agent_name_accepts_valid_lengths(#[case] input: &str) {
    let name = AgentName::new(input).expect("name should validate");
    assert_eq!(name.as_str(), input);
}

#[rstest]
#[case("")]
#[case("ab")]
fn agent_name_rejects_short_values(#[case] input: &str) {
    assert!(matches!(
        AgentName::new(input),
        Err(RegistryDomainError::AgentNameLength(_))
    ));
}

#[test]
fn agent_name_rejects_oversized_value() {
    let input = "x".repeat(101);
    assert!(matches!(
        AgentName::new(input),
        Err(RegistryDomainError::AgentNameLength(_))
    ));
}

#[test]
fn agent_name_trims_before_validation() {
    let name = AgentName::new("  padded name  ").expect("name should validate");
    assert_eq!(name.as_str(), "padded name");
}

#[rstest]
#[case("https://agent.example.com")]
#[case("http://localhost:5000/chat")]
fn endpoint_accepts_http_addresses(#[case] input: &str) {
    assert!(EndpointUrl::new(input).is_ok());
}

#[rstest]
#[case("ftp://agent.example.com")]
#[case("agent.example.com")]
#[case("https://")]
#[case("https://host with spaces")]
fn endpoint_rejects_malformed_addresses(#[case] input: &str) {
    assert!(matches!(
        EndpointUrl::new(input),
        Err(RegistryDomainError::InvalidEndpoint(_))
    ));
}

#[test]
fn endpoint_rejects_oversized_address() {
    let input = format!("https://example.com/{}", "a".repeat(500));
    assert!(EndpointUrl::new(input).is_err());
}

#[rstest]
#[case(0)]
#[case(1001)]
fn capacity_rejects_out_of_range(#[case] value: u32) {
    assert!(matches!(
        SessionCapacity::new(value),
        Err(RegistryDomainError::CapacityOutOfRange(_))
    ));
}

#[test]
fn capacity_defaults_to_ten() {
    assert_eq!(SessionCapacity::default().get(), 10);
}

#[rstest]
#[case("general", AgentKind::General)]
#[case("  MCP ", AgentKind::Mcp)]
fn kind_parses_known_values(#[case] input: &str, #[case] expected: AgentKind) {
    assert_eq!(AgentKind::try_from(input).expect("kind should parse"), expected);
}

#[test]
fn kind_rejects_unknown_value() {
    assert!(AgentKind::try_from("sidecar").is_err());
}

#[test]
fn capabilities_normalise_and_deduplicate() {
    let capabilities = AgentCapabilities::from_labels([
        "Chat".to_owned(),
        " chat ".to_owned(),
        "code_generation".to_owned(),
        String::new(),
    ]);

    assert_eq!(capabilities.len(), 2);
    assert!(capabilities.supports("CHAT"));
    assert!(capabilities.supports("code_generation"));
    assert!(!capabilities.supports("images"));
}

#[test]
fn credential_verifies_only_the_original_key() {
    let credential = ApiCredential::derive("top-secret-key");

    assert!(credential.verify("top-secret-key"));
    assert!(!credential.verify("top-secret-kez"));
    assert!(!credential.verify(""));
}

#[test]
fn credential_derivations_are_salted() {
    let first = ApiCredential::derive("same-key");
    let second = ApiCredential::derive("same-key");

    // Fresh salt per derivation: the stored forms differ even for one key.
    assert_ne!(first, second);
    assert!(first.verify("same-key"));
    assert!(second.verify("same-key"));
}

#[test]
fn status_round_trips_through_storage_form() {
    for status in [AgentStatus::Active, AgentStatus::Inactive] {
        let parsed = AgentStatus::try_from(status.as_str()).expect("status should parse");
        assert_eq!(parsed, status);
    }
}
