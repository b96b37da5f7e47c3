//! Per-user session storage.
//!
//! The engine is shared; each user gets an isolated [`SessionState`]
//! keyed by a session id.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::engine::{QuizEngine, SessionState};
use crate::shuffle::OptionShuffler;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session on the engine's first level and return its id.
    pub fn open<S: OptionShuffler>(&mut self, engine: &QuizEngine<S>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, engine.new_session());
        info!(session = %id, "opened quiz session");
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&SessionState> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut SessionState> {
        self.sessions.get_mut(id)
    }

    /// Store a state that was taken out or restored elsewhere.
    pub fn put(&mut self, id: Uuid, state: SessionState) -> Option<SessionState> {
        self.sessions.insert(id, state)
    }

    pub fn close(&mut self, id: &Uuid) -> Option<SessionState> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            info!(session = %id, "closed quiz session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
