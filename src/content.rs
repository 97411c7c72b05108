//! Scripted content and outbound items
//!
//! Scripts are pure data. The sequencer turns a script into a timed stream of
//! outbound items; delivering them (and sleeping) is the transport's job.

pub mod sequencer;

pub use sequencer::Sequencer;

use crate::state_machine::StateId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One entry of a content script
///
/// Serialized untagged so a script reads like the authored list it came
/// from: strings are messages, numbers are delays in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    Text(String),
    Delay(f64),
}

impl ContentEntry {
    pub fn text(value: impl Into<String>) -> Self {
        ContentEntry::Text(value.into())
    }
}

/// Content scripts keyed by the state whose entry plays them
#[derive(Debug, Clone, Default)]
pub struct ContentScripts {
    scripts: HashMap<StateId, Vec<ContentEntry>>,
}

impl ContentScripts {
    pub fn new(scripts: HashMap<StateId, Vec<ContentEntry>>) -> Self {
        Self { scripts }
    }

    pub fn get(&self, state: StateId) -> Option<&[ContentEntry]> {
        self.scripts.get(&state).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }
}

/// An inline keyboard button offered with a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Items handed to the transport, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundItem {
    /// Display a message
    EmitText(String),
    /// Display a message with a set of buttons
    Prompt { text: String, buttons: Vec<Button> },
    /// Suspend this session's delivery before the next item
    Wait(Duration),
}

impl OutboundItem {
    pub fn is_wait(&self) -> bool {
        matches!(self, OutboundItem::Wait(_))
    }
}
