//! Agent kind tag used to match sessions to compatible agents.

use super::ParseAgentKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of workload an agent serves.
///
/// Sessions request a kind, and routing only considers agents whose kind
/// matches. The allowed set mirrors the platform registration contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// General-purpose conversational agent.
    General,
    /// Agent specialised for a narrow task family.
    Specialized,
    /// Agent exposed through the MCP adapter.
    Mcp,
    /// Operator-defined custom agent.
    Custom,
}

impl AgentKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Specialized => "specialized",
            Self::Mcp => "mcp",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentKind {
    type Error = ParseAgentKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "general" => Ok(Self::General),
            "specialized" => Ok(Self::Specialized),
            "mcp" => Ok(Self::Mcp),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseAgentKindError(value.to_owned())),
        }
    }
}
