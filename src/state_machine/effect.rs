//! Effects produced by state transitions

use crate::content::Button;
use crate::route::Stage;
use crate::state_machine::state::StateId;
use std::time::Duration;

/// Effects, applied in order after a transition is accepted
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    // Session mutations
    /// Create (or overwrite) the session record
    StartSession,

    /// Store the access code and reset the route position
    BeginStage { stage: Stage, code: String },

    /// A waypoint is done; move one step along the route
    AdvanceQueue,

    /// Reset the quiz score
    BeginQuiz,

    RecordAnswer { question: String, correct: bool },

    /// Drop the session record
    Archive,

    // Outbound
    /// Play the content script of a state
    PlayScript { state: StateId },

    Say { text: String },

    Prompt { text: String, buttons: Vec<Button> },

    Pause { duration: Duration },
}

impl Effect {
    pub fn say(text: impl Into<String>) -> Self {
        Effect::Say { text: text.into() }
    }

    /// Prompt with a single button
    pub fn prompt(text: impl Into<String>, label: &str, token: &str) -> Self {
        Effect::Prompt {
            text: text.into(),
            buttons: vec![Button::new(label, token)],
        }
    }

    pub fn play(state: StateId) -> Self {
        Effect::PlayScript { state }
    }

    pub fn pause(duration: Duration) -> Self {
        Effect::Pause { duration }
    }

    /// True for effects that change the session record
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Effect::StartSession
                | Effect::BeginStage { .. }
                | Effect::AdvanceQueue
                | Effect::BeginQuiz
                | Effect::RecordAnswer { .. }
                | Effect::Archive
        )
    }
}
