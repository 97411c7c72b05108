//! In-memory session store

use super::{Session, SessionMutation, SessionStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-lifetime store; every operation holds one lock for its duration
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Session>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|e| StoreError::Backend(format!("session map lock poisoned: {e}")))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.lock()?.get(session_id).cloned())
    }

    async fn create(&self, session_id: &str) -> Result<Session, StoreError> {
        let session = Session::new(session_id);
        self.lock()?
            .insert(session_id.to_string(), session.clone());
        Ok(session)
    }

    async fn mutate(
        &self,
        session_id: &str,
        mutation: SessionMutation,
    ) -> Result<Session, StoreError> {
        let mut sessions = self.lock()?;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        mutation(session);
        Ok(session.clone())
    }

    async fn remove(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.lock()?.remove(session_id))
    }
}
