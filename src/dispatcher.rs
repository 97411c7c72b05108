//! Input dispatcher
//!
//! Evaluates the transition table against the stored session, commits the
//! accepted transition to the store, and renders its outbound effects.

use crate::catalog::Catalog;
use crate::config::ConfigError;
use crate::content::OutboundItem;
use crate::session::{Session, SessionStore, StoreError};
use crate::state_machine::{
    Effect, InputEvent, Outcome, TransitionError, TransitionResult, TransitionTable,
    FALLBACK_TEXT,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What one input produced
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub outcome: Outcome,
    pub outbound: Vec<OutboundItem>,
    /// No session record is left for this id
    pub ended: bool,
}

pub struct Dispatcher<S: SessionStore> {
    catalog: Arc<Catalog>,
    table: TransitionTable,
    store: S,
}

impl<S: SessionStore> Dispatcher<S> {
    pub fn new(catalog: Arc<Catalog>, store: S) -> Result<Self, ConfigError> {
        let table = TransitionTable::new(&catalog)?;
        Ok(Self {
            catalog,
            table,
            store,
        })
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn handle(
        &self,
        session_id: &str,
        event: &InputEvent,
    ) -> Result<Dispatch, DispatchError> {
        let session = self.store.get(session_id).await?;
        let outcome = self.table.evaluate(session.as_ref(), event, &self.catalog)?;

        let Outcome::Transition(result) = &outcome else {
            tracing::debug!(
                session_id = %session_id,
                state = ?session.as_ref().map(|s| s.state),
                ?event,
                "Unhandled input"
            );
            return Ok(Dispatch {
                outcome,
                outbound: vec![OutboundItem::EmitText(FALLBACK_TEXT.to_string())],
                ended: session.is_none(),
            });
        };

        self.commit(session_id, session.as_ref(), result).await?;
        let outbound = self.render(result);
        let ended = result.effects.contains(&Effect::Archive);
        Ok(Dispatch {
            outcome,
            outbound,
            ended,
        })
    }

    async fn commit(
        &self,
        session_id: &str,
        previous: Option<&Session>,
        result: &TransitionResult,
    ) -> Result<(), DispatchError> {
        let starting = result.effects.contains(&Effect::StartSession);
        if starting {
            self.store.create(session_id).await?;
            tracing::info!(session_id = %session_id, "Session started");
        } else if !result.has_mutation()
            && previous.is_some_and(|s| s.state == result.new_state)
        {
            return Ok(());
        }

        let applied = result.clone();
        let session = self
            .store
            .mutate(session_id, Box::new(move |s: &mut Session| s.apply(&applied)))
            .await?;

        if let Some(Effect::BeginStage { stage, code }) = result
            .effects
            .iter()
            .find(|effect| matches!(effect, Effect::BeginStage { .. }))
        {
            tracing::info!(session_id = %session_id, ?stage, code = %code, "Stage started");
        }
        tracing::debug!(
            session_id = %session_id,
            from = ?previous.map(|s| s.state),
            to = ?session.state,
            queue = session.queue,
            "State transition"
        );

        if result.effects.contains(&Effect::Archive) {
            self.store.remove(session_id).await?;
            tracing::info!(
                session_id = %session_id,
                correct_answers = session.quiz.correct_count(),
                elapsed_secs = (session.updated_at - session.started_at).num_seconds(),
                "Quest complete"
            );
        }
        Ok(())
    }

    /// Outbound effects in order, scripts expanded by the sequencer.
    ///
    /// Waits follow the sequencer's rules across effects too: a pause next to
    /// a script that plays nothing never yields a leading, doubled or
    /// trailing wait.
    fn render(&self, result: &TransitionResult) -> Vec<OutboundItem> {
        let sequencer = self.catalog.sequencer();
        let mut outbound = Vec::new();
        for effect in &result.effects {
            match effect {
                Effect::PlayScript { state } => outbound.extend(sequencer.play(*state)),
                Effect::Say { text } => outbound.push(OutboundItem::EmitText(text.clone())),
                Effect::Prompt { text, buttons } => outbound.push(OutboundItem::Prompt {
                    text: text.clone(),
                    buttons: buttons.clone(),
                }),
                Effect::Pause { duration } => outbound.push(OutboundItem::Wait(*duration)),
                Effect::StartSession
                | Effect::BeginStage { .. }
                | Effect::AdvanceQueue
                | Effect::BeginQuiz
                | Effect::RecordAnswer { .. }
                | Effect::Archive => {}
            }
        }
        collapse_waits(outbound)
    }
}

fn collapse_waits(items: Vec<OutboundItem>) -> Vec<OutboundItem> {
    let mut collapsed: Vec<OutboundItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.is_wait() && matches!(collapsed.last(), None | Some(OutboundItem::Wait(_))) {
            continue;
        }
        collapsed.push(item);
    }
    if collapsed.last().is_some_and(OutboundItem::is_wait) {
        collapsed.pop();
    }
    collapsed
}
