//! In-memory session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::health::ports::ActiveSessionSource;
use crate::registry::domain::{AgentId, AgentKind};
use crate::routing::{
    domain::{CallerKey, Session, SessionId},
    ports::{SessionRepository, SessionRepositoryError, SessionRepositoryResult},
};

/// Thread-safe in-memory session repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    state: Arc<RwLock<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    sessions: HashMap<SessionId, Session>,
    // One active session per caller and kind.
    active_index: HashMap<(CallerKey, AgentKind), SessionId>,
}

impl InMemorySessionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> SessionRepositoryError {
    SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: &Session) -> SessionRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let key = (session.caller_key().clone(), session.kind());
        if let Some(&existing_id) = state.active_index.get(&key)
            && state
                .sessions
                .get(&existing_id)
                .is_some_and(Session::is_active)
        {
            return Err(SessionRepositoryError::DuplicateActiveSession(existing_id));
        }

        if session.is_active() {
            state.active_index.insert(key, session.id());
        }
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> SessionRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        let stored = state
            .sessions
            .get(&session.id())
            .ok_or(SessionRepositoryError::NotFound(session.id()))?;
        if stored.version() != session.version() {
            return Err(SessionRepositoryError::VersionConflict(session.id()));
        }

        let key = (session.caller_key().clone(), session.kind());
        if session.is_active() {
            state.active_index.insert(key, session.id());
        } else if state.active_index.get(&key) == Some(&session.id()) {
            state.active_index.remove(&key);
        }

        let mut next = session.clone();
        next.advance_version();
        state.sessions.insert(next.id(), next);
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.sessions.get(&id).cloned())
    }

    async fn find_active(
        &self,
        caller_key: &CallerKey,
        kind: AgentKind,
    ) -> SessionRepositoryResult<Option<Session>> {
        let state = self.state.read().map_err(poisoned)?;
        let session = state
            .active_index
            .get(&(caller_key.clone(), kind))
            .and_then(|id| state.sessions.get(id))
            .filter(|session| session.is_active())
            .cloned();
        Ok(session)
    }

    async fn list_active_by_agent(
        &self,
        agent_id: AgentId,
    ) -> SessionRepositoryResult<Vec<Session>> {
        let state = self.state.read().map_err(poisoned)?;
        let sessions = state
            .sessions
            .values()
            .filter(|session| session.is_active() && session.agent_id() == agent_id)
            .cloned()
            .collect();
        Ok(sessions)
    }

    async fn flag_failover_pending(
        &self,
        agent_id: AgentId,
    ) -> SessionRepositoryResult<Vec<SessionId>> {
        let mut state = self.state.write().map_err(poisoned)?;
        let mut flagged = Vec::new();
        for session in state.sessions.values_mut() {
            if session.is_active() && session.agent_id() == agent_id && !session.failover_pending()
            {
                session.mark_failover_pending();
                session.advance_version();
                flagged.push(session.id());
            }
        }
        Ok(flagged)
    }
}

#[async_trait]
impl ActiveSessionSource for InMemorySessionRepository {
    async fn active_sessions_owned_by(&self, agent_id: AgentId) -> Vec<SessionId> {
        self.list_active_by_agent(agent_id)
            .await
            .map(|sessions| sessions.iter().map(Session::id).collect())
            .unwrap_or_default()
    }
}
