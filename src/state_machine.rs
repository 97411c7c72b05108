//! Quest state machine
//!
//! A static transition table evaluated by one pure function. Session
//! mutation and rendering happen in the dispatcher, never here.

mod dialogue;
mod effect;
pub mod event;
pub mod guard;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::InputEvent;
pub use state::StateId;
pub use transition::{Outcome, TransitionError, TransitionResult, TransitionTable, FALLBACK_TEXT};
