//! Append-only conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the conversation produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The calling party.
    Caller,
    /// The assigned agent.
    Agent,
}

impl Speaker {
    /// Storage form of the speaker tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Caller => "caller",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in a session's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    speaker: Speaker,
    content: String,
    at: DateTime<Utc>,
}

impl TurnRecord {
    pub(crate) const fn new(speaker: Speaker, content: String, at: DateTime<Utc>) -> Self {
        Self {
            speaker,
            content,
            at,
        }
    }

    /// Who produced this turn.
    #[must_use]
    pub const fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// The turn content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the turn was recorded.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }
}
