//! Session records and the session store
//!
//! A session's state, route position and quiz score all live in one record,
//! so a single store mutation moves all of them together.

mod memory;

pub use memory::InMemorySessionStore;

use crate::quiz::QuizScore;
use crate::route::Stage;
use crate::state_machine::{Effect, StateId, TransitionResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub stage: Stage,
    pub state: StateId,
    /// Access code of the current stage; `None` until one is accepted
    pub route_code: Option<String>,
    /// Index into the route sequence of `(stage, route_code)`
    pub queue: usize,
    pub quiz: QuizScore,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            stage: Stage::Stage1,
            state: StateId::AwaitingAccessCode,
            route_code: None,
            queue: 0,
            quiz: QuizScore::default(),
            started_at: now,
            updated_at: now,
        }
    }

    /// Apply a transition's session mutations and move to its new state.
    ///
    /// `StartSession` and `Archive` act on the store, not the record.
    pub fn apply(&mut self, result: &TransitionResult) {
        for effect in &result.effects {
            match effect {
                Effect::BeginStage { stage, code } => {
                    self.stage = *stage;
                    self.route_code = Some(code.clone());
                    self.queue = 0;
                }
                Effect::AdvanceQueue => self.queue += 1,
                Effect::BeginQuiz => self.quiz = QuizScore::default(),
                Effect::RecordAnswer { question, correct } => {
                    self.quiz.record(question, *correct);
                }
                _ => {}
            }
        }
        self.state = result.new_state;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Session store failure: {0}")]
    Backend(String),
}

/// A read-modify-write step run under the store's lock
pub type SessionMutation = Box<dyn FnOnce(&mut Session) + Send>;

/// Storage for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError>;

    /// Create a fresh record, replacing any existing one
    async fn create(&self, session_id: &str) -> Result<Session, StoreError>;

    /// Atomically mutate an existing record and return the result
    async fn mutate(
        &self,
        session_id: &str,
        mutation: SessionMutation,
    ) -> Result<Session, StoreError>;

    /// Drop a record, returning it if it existed
    async fn remove(&self, session_id: &str) -> Result<Option<Session>, StoreError>;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        (**self).get(session_id).await
    }

    async fn create(&self, session_id: &str) -> Result<Session, StoreError> {
        (**self).create(session_id).await
    }

    async fn mutate(
        &self,
        session_id: &str,
        mutation: SessionMutation,
    ) -> Result<Session, StoreError> {
        (**self).mutate(session_id, mutation).await
    }

    async fn remove(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        (**self).remove(session_id).await
    }
}
