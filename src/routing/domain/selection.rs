//! Agent ranking for session placement.

use crate::registry::domain::AgentRecord;

/// An agent under consideration, paired with its health score.
///
/// Agents without a recorded summary rank at the initial score of 100.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The agent record.
    pub record: AgentRecord,
    /// Health score in `[0, 100]`.
    pub score: f64,
}

/// Picks the best placement from a candidate set.
///
/// Agents with free capacity are preferred; when none has spare room the
/// declared capacity is treated as advisory and the whole set competes.
/// Ranking is by score descending, then fewest current sessions, then
/// earliest registration, then id, giving a stable total order.
#[must_use]
pub fn select_agent(candidates: Vec<Candidate>) -> Option<AgentRecord> {
    if candidates.is_empty() {
        return None;
    }

    let mut pool: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.record.has_free_capacity())
        .cloned()
        .collect();
    if pool.is_empty() {
        pool = candidates;
    }

    pool.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.record.current_sessions().cmp(&b.record.current_sessions()))
            .then_with(|| a.record.created_at().cmp(&b.record.created_at()))
            .then_with(|| a.record.id().cmp(&b.record.id()))
    });

    pool.into_iter().next().map(|candidate| candidate.record)
}
