//! Declared capability set for an agent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of functions an agent declares support for.
///
/// Capability labels are normalised to lowercase and deduplicated. The set is
/// advisory metadata carried through registration and discovery; routing
/// matches on [`super::AgentKind`], with capabilities available to callers
/// that want finer filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentCapabilities(BTreeSet<String>);

impl AgentCapabilities {
    /// Creates an empty capability set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds a capability set from labels, dropping empties after trimming.
    pub fn from_labels(labels: impl IntoIterator<Item = String>) -> Self {
        let normalized = labels
            .into_iter()
            .map(|label| label.trim().to_ascii_lowercase())
            .filter(|label| !label.is_empty())
            .collect();
        Self(normalized)
    }

    /// Returns `true` when the agent declares the given capability.
    #[must_use]
    pub fn supports(&self, label: &str) -> bool {
        self.0.contains(&label.trim().to_ascii_lowercase())
    }

    /// Returns `true` when no capabilities are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of declared capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the declared capability labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for AgentCapabilities {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}
