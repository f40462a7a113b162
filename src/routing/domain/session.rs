//! The session aggregate.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::domain::{AgentId, AgentKind};
use crate::routing::domain::{
    CallerKey, IntegrityToken, RouterSecret, RoutingDomainError, SessionId, Speaker, TurnRecord,
};

/// Construction parameters for a new session.
#[derive(Debug, Clone)]
pub struct NewSessionParams {
    /// The caller the session belongs to.
    pub caller_key: CallerKey,
    /// The requested agent kind.
    pub kind: AgentKind,
    /// The agent the session is initially placed on.
    pub agent_id: AgentId,
}

/// One conversational session and its routing state.
///
/// The caller key and kind are fixed at creation and together identify the
/// caller's single active session of that kind. Ownership (`agent_id`)
/// changes only through failover; history is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    caller_key: CallerKey,
    kind: AgentKind,
    agent_id: AgentId,
    token: IntegrityToken,
    nonce: Uuid,
    history: Vec<TurnRecord>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    active: bool,
    failover_pending: bool,
    version: u64,
}

impl Session {
    /// Creates an active session with a freshly derived integrity token.
    #[must_use]
    pub fn new(params: NewSessionParams, secret: &RouterSecret, clock: &impl Clock) -> Self {
        let id = SessionId::new();
        let nonce = Uuid::new_v4();
        let token = IntegrityToken::derive(id, secret, nonce);
        let now = clock.utc();
        Self {
            id,
            caller_key: params.caller_key,
            kind: params.kind,
            agent_id: params.agent_id,
            token,
            nonce,
            history: Vec::new(),
            created_at: now,
            last_activity: now,
            active: true,
            failover_pending: false,
            version: 0,
        }
    }

    /// Unique session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The caller the session belongs to.
    #[must_use]
    pub const fn caller_key(&self) -> &CallerKey {
        &self.caller_key
    }

    /// The requested agent kind.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    /// The currently owning agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// The integrity token issued to the caller.
    #[must_use]
    pub const fn token(&self) -> &IntegrityToken {
        &self.token
    }

    /// The conversation history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// When the session was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Most recent activity timestamp.
    #[must_use]
    pub const fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Whether the session is still live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the session is waiting to be moved off its agent.
    #[must_use]
    pub const fn failover_pending(&self) -> bool {
        self.failover_pending
    }

    /// Optimistic-concurrency version stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Compares a presented integrity token in constant time.
    #[must_use]
    pub fn verify_integrity(&self, presented: &str) -> bool {
        self.token.verify(presented)
    }

    /// Appends one turn to the history.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::SessionClosed`] when the session is no
    /// longer active, or [`RoutingDomainError::EmptyTurnContent`] when the
    /// trimmed content is empty.
    pub fn record_turn(
        &mut self,
        speaker: Speaker,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), RoutingDomainError> {
        if !self.active {
            return Err(RoutingDomainError::SessionClosed);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(RoutingDomainError::EmptyTurnContent);
        }
        self.history.push(TurnRecord::new(speaker, content, now));
        self.last_activity = now;
        Ok(())
    }

    /// Moves the session to a new owning agent, clearing any pending flag.
    pub fn reassign(&mut self, agent_id: AgentId, now: DateTime<Utc>) {
        self.agent_id = agent_id;
        self.failover_pending = false;
        self.last_activity = now;
    }

    /// Marks the session as needing failover.
    pub fn mark_failover_pending(&mut self) {
        self.failover_pending = true;
    }

    /// Ends the session.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.failover_pending = false;
        self.last_activity = now;
    }

    pub(crate) fn advance_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
