use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::session::QuizSession;

/// In-memory quiz sessions keyed by id. The lock is never held across an
/// `.await`.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, QuizSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, QuizSession>>> {
        self.sessions
            .lock()
            .map_err(|_| Error::Internal("session store lock poisoned".to_string()))
    }

    pub fn create(&self) -> Result<QuizSession> {
        let session = QuizSession::new();
        self.lock()?.insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, "session created");
        Ok(session)
    }

    pub fn get(&self, id: Uuid) -> Result<QuizSession> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Applies `f` to the stored session and returns its result.
    pub fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> Result<T>) -> Result<T> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(session)
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.lock()?
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "session removed"))
            .ok_or_else(|| not_found(id))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Session {} not found", id))
}
