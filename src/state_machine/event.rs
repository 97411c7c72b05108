//! Input events delivered by the transport

use serde::{Deserialize, Serialize};

/// Command that (re)starts a session from any state
pub const START_COMMAND: &str = "/start";

/// Participant input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputEvent {
    /// Free text typed by the participant
    TextInput(String),
    /// Token carried by a pressed button
    ButtonPress(String),
}

impl InputEvent {
    pub fn text(value: impl Into<String>) -> Self {
        InputEvent::TextInput(value.into())
    }

    pub fn button(token: impl Into<String>) -> Self {
        InputEvent::ButtonPress(token.into())
    }

    #[cfg(test)]
    pub fn start() -> Self {
        InputEvent::text(START_COMMAND)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputEvent::TextInput(text) => Some(text),
            InputEvent::ButtonPress(_) => None,
        }
    }

    pub fn as_button(&self) -> Option<&str> {
        match self {
            InputEvent::ButtonPress(token) => Some(token),
            InputEvent::TextInput(_) => None,
        }
    }

    /// `/start`, `/start payload` or `/start@botname`
    pub fn is_start_command(&self) -> bool {
        self.as_text().is_some_and(|text| {
            text.strip_prefix(START_COMMAND)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '@']))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_command_variants() {
        assert!(InputEvent::start().is_start_command());
        assert!(InputEvent::text("/start deep-link").is_start_command());
        assert!(InputEvent::text("/start@quest_bot").is_start_command());
        assert!(!InputEvent::text("/started").is_start_command());
        assert!(!InputEvent::text("start").is_start_command());
        assert!(!InputEvent::button("/start").is_start_command());
    }

    #[test]
    fn test_event_serde_shape() {
        let json = serde_json::to_value(InputEvent::button("yes")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "button_press", "value": "yes"}));
    }
}
