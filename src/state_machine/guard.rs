//! Input guards
//!
//! Every guard accepts a finite set of inputs that can be listed, which is
//! what lets the table reject overlapping rows at startup. Text literals are
//! matched exactly; case variants are spelled out in the table.

use crate::catalog::Catalog;
use crate::quiz::{answer_token, parse_answer_token};
use crate::route::Stage;
use crate::state_machine::event::{InputEvent, START_COMMAND};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// `/start` with an optional payload or bot suffix
    StartCommand,
    /// Exact text, any of the listed literals
    Text(&'static [&'static str]),
    /// Exact button token
    Button(&'static str),
    /// An access code of the stage's route table
    RouteCode(Stage),
    /// A quiz question key
    QuizKey,
    /// An answer button for a known quiz question
    QuizAnswer,
}

impl Guard {
    pub fn matches(&self, event: &InputEvent, catalog: &Catalog) -> bool {
        match (self, event) {
            (Guard::StartCommand, _) => event.is_start_command(),
            (Guard::Text(literals), InputEvent::TextInput(text)) => {
                literals.iter().any(|literal| *literal == text.as_str())
            }
            (Guard::Button(expected), InputEvent::ButtonPress(token)) => token == expected,
            (Guard::RouteCode(stage), InputEvent::TextInput(text)) => {
                catalog.routes.table(*stage).contains(text)
            }
            (Guard::QuizKey, InputEvent::TextInput(text)) => catalog.quiz.contains(text),
            (Guard::QuizAnswer, InputEvent::ButtonPress(token)) => {
                parse_answer_token(token).is_some_and(|(key, _)| catalog.quiz.contains(key))
            }
            _ => false,
        }
    }

    /// Representative inputs: every literal, plus the bare start command
    pub fn tokens(&self, catalog: &Catalog) -> Vec<GuardToken> {
        match self {
            Guard::StartCommand => vec![GuardToken::Text(START_COMMAND.to_string())],
            Guard::Text(literals) => literals
                .iter()
                .map(|literal| GuardToken::Text((*literal).to_string()))
                .collect(),
            Guard::Button(token) => vec![GuardToken::Button((*token).to_string())],
            Guard::RouteCode(stage) => catalog
                .routes
                .table(*stage)
                .codes()
                .map(|code| GuardToken::Text(code.to_string()))
                .collect(),
            Guard::QuizKey => catalog
                .quiz
                .keys()
                .map(|key| GuardToken::Text(key.to_string()))
                .collect(),
            Guard::QuizAnswer => catalog
                .quiz
                .keys()
                .flat_map(|key| {
                    [true, false].map(|given| GuardToken::Button(answer_token(key, given)))
                })
                .collect(),
        }
    }
}

/// One concrete accepted input
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuardToken {
    Text(String),
    Button(String),
}

impl GuardToken {
    pub fn to_event(&self) -> InputEvent {
        match self {
            GuardToken::Text(text) => InputEvent::text(text.as_str()),
            GuardToken::Button(token) => InputEvent::button(token.as_str()),
        }
    }
}

impl fmt::Display for GuardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardToken::Text(text) => write!(f, "text {text:?}"),
            GuardToken::Button(token) => write!(f, "button {token:?}"),
        }
    }
}
