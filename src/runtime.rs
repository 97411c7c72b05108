//! Runtime for executing quest sessions
//!
//! One worker task per session. Sessions never wait on each other; events of
//! one session are handled one at a time. A worker retires once its session
//! has no record left (archived, or input that never started one).

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionWorker;
pub use traits::Transport;

use crate::dispatcher::Dispatcher;
use crate::session::SessionStore;
use crate::state_machine::InputEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const EVENT_QUEUE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Runtime is shutting down")]
    ShuttingDown,
    #[error("Event queue for session {0} is full")]
    QueueFull(String),
    #[error("Worker for session {0} has stopped")]
    WorkerStopped(String),
}

/// Live workers by session id, shared with the workers so they can retire
pub type WorkerMap = Arc<RwLock<HashMap<String, SessionHandle>>>;

/// Handle to interact with a running session worker
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<InputEvent>,
    /// Tells a retiring worker apart from its replacement under the same id
    generation: u64,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue without waiting. A closed channel hands the event back.
    fn enqueue(
        &self,
        session_id: &str,
        event: InputEvent,
    ) -> Result<Option<InputEvent>, RuntimeError> {
        match self.event_tx.try_send(event) {
            Ok(()) => Ok(None),
            Err(TrySendError::Full(_)) => Err(RuntimeError::QueueFull(session_id.to_string())),
            Err(TrySendError::Closed(event)) => Ok(Some(event)),
        }
    }
}

/// Manager for all session workers
pub struct QuestRuntime<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    dispatcher: Arc<Dispatcher<S>>,
    transport: Arc<T>,
    workers: WorkerMap,
    next_generation: AtomicU64,
    cancel: CancellationToken,
}

impl<S, T> QuestRuntime<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    pub fn new(dispatcher: Dispatcher<S>, transport: T) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            transport: Arc::new(transport),
            workers: Arc::new(RwLock::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    #[cfg(test)]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Queue an event for its session, starting a worker if needed.
    ///
    /// Never waits on a busy session: a full queue is reported as
    /// `QueueFull` and the event is dropped. Sends happen under the worker
    /// map lock, so a retiring worker either sees the event or is already
    /// gone from the map.
    pub async fn submit(
        &self,
        session_id: &str,
        mut event: InputEvent,
    ) -> Result<(), RuntimeError> {
        if self.cancel.is_cancelled() {
            return Err(RuntimeError::ShuttingDown);
        }

        {
            let workers = self.workers.read().await;
            if let Some(handle) = workers.get(session_id) {
                match handle.enqueue(session_id, event)? {
                    None => return Ok(()),
                    Some(returned) => event = returned,
                }
            }
        }

        let mut workers = self.workers.write().await;
        // Another submit may have spawned it between the locks
        if let Some(handle) = workers.get(session_id) {
            match handle.enqueue(session_id, event)? {
                None => return Ok(()),
                Some(returned) => event = returned,
            }
        }

        let handle = self.spawn_worker(session_id);
        let queued = handle.enqueue(session_id, event);
        workers.insert(session_id.to_string(), handle);
        match queued? {
            None => Ok(()),
            Some(_) => Err(RuntimeError::WorkerStopped(session_id.to_string())),
        }
    }

    fn spawn_worker(&self, session_id: &str) -> SessionHandle {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let worker = SessionWorker::new(
            session_id.to_string(),
            generation,
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.transport),
            event_rx,
            Arc::clone(&self.workers),
            self.cancel.child_token(),
        );
        SessionHandle {
            event_tx,
            generation,
            task: tokio::spawn(worker.run()),
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.workers.read().await.len()
    }

    /// Let every worker finish its queued events, then stop it
    pub async fn close(&self) {
        let handles = self.take_workers().await;
        Self::join(handles).await;
    }

    /// Stop every worker now, abandoning queued events and pending waits
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handles = self.take_workers().await;
        Self::join(handles).await;
    }

    async fn take_workers(&self) -> Vec<SessionHandle> {
        let mut workers = self.workers.write().await;
        workers.drain().map(|(_, handle)| handle).collect()
    }

    async fn join(handles: Vec<SessionHandle>) {
        for SessionHandle { event_tx, task, .. } in handles {
            drop(event_tx);
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Session worker panicked");
            }
        }
    }
}
