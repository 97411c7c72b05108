//! Per-session worker

use super::traits::Transport;
use super::WorkerMap;
use crate::content::OutboundItem;
use crate::dispatcher::Dispatcher;
use crate::session::SessionStore;
use crate::state_machine::InputEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Handles one session's events strictly in arrival order.
///
/// The next event is not received until every outbound item of the current
/// one has been delivered, waits included.
pub struct SessionWorker<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    session_id: String,
    generation: u64,
    dispatcher: Arc<Dispatcher<S>>,
    transport: Arc<T>,
    event_rx: mpsc::Receiver<InputEvent>,
    workers: WorkerMap,
    cancel: CancellationToken,
}

impl<S, T> SessionWorker<S, T>
where
    S: SessionStore + 'static,
    T: Transport + 'static,
{
    pub fn new(
        session_id: String,
        generation: u64,
        dispatcher: Arc<Dispatcher<S>>,
        transport: Arc<T>,
        event_rx: mpsc::Receiver<InputEvent>,
        workers: WorkerMap,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session_id,
            generation,
            dispatcher,
            transport,
            event_rx,
            workers,
            cancel,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Session worker started");

        let mut pending: Option<InputEvent> = None;
        loop {
            let event = match pending.take() {
                Some(event) => event,
                None => tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => break,
                    event = self.event_rx.recv() => match event {
                        Some(event) => event,
                        None => break,
                    },
                },
            };

            let ended = self.process_event(event).await;
            if ended && !self.cancel.is_cancelled() {
                match self.retire().await {
                    Some(event) => pending = Some(event),
                    None => break,
                }
            }
        }

        tracing::info!(session_id = %self.session_id, "Session worker stopped");
    }

    /// Returns true when no session record remains for this id
    async fn process_event(&self, event: InputEvent) -> bool {
        match self.dispatcher.handle(&self.session_id, &event).await {
            Ok(dispatch) => {
                self.deliver_all(&dispatch.outbound).await;
                dispatch.ended
            }
            Err(e) => {
                tracing::error!(
                    session_id = %self.session_id,
                    error = %e,
                    ?event,
                    "Error handling event"
                );
                false
            }
        }
    }

    /// Leave the worker map unless an event is already queued.
    ///
    /// `submit` only sends under the map lock, so once the entry is gone no
    /// event can reach this receiver.
    async fn retire(&mut self) -> Option<InputEvent> {
        let mut workers = self.workers.write().await;
        if let Ok(event) = self.event_rx.try_recv() {
            return Some(event);
        }
        if workers
            .get(&self.session_id)
            .is_some_and(|handle| handle.generation == self.generation)
        {
            workers.remove(&self.session_id);
        }
        self.event_rx.close();
        tracing::debug!(session_id = %self.session_id, "Session worker retired");
        None
    }

    async fn deliver_all(&self, items: &[OutboundItem]) {
        for item in items {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return,
                delivered = self.transport.deliver(&self.session_id, item) => {
                    if let Err(e) = delivered {
                        tracing::warn!(
                            session_id = %self.session_id,
                            error = %e,
                            "Failed to deliver outbound item"
                        );
                    }
                }
            }
        }
    }
}
