//! Line-oriented console transport
//!
//! Input lines are `<session> <text>` or `<session> [token]` for a button
//! press. Output goes to stdout, one line per message, prefixed with the
//! session id.

use crate::content::OutboundItem;
use crate::runtime::Transport;
use crate::state_machine::InputEvent;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct ConsoleTransport {
    stdout: Mutex<tokio::io::Stdout>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a visible item; `None` for waits
pub fn render(session_id: &str, item: &OutboundItem) -> Option<String> {
    match item {
        OutboundItem::EmitText(text) => Some(format!("[{session_id}] {text}\n")),
        OutboundItem::Prompt { text, buttons } => {
            let mut out = format!("[{session_id}] {text}\n");
            for button in buttons {
                out.push_str(&format!(
                    "[{session_id}]   ({}) -> [{}]\n",
                    button.label, button.token
                ));
            }
            Some(out)
        }
        OutboundItem::Wait(_) => None,
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn deliver(&self, session_id: &str, item: &OutboundItem) -> Result<(), String> {
        if let OutboundItem::Wait(duration) = item {
            tokio::time::sleep(*duration).await;
            return Ok(());
        }
        let Some(line) = render(session_id, item) else {
            return Ok(());
        };

        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| format!("stdout write failed: {e}"))?;
        stdout
            .flush()
            .await
            .map_err(|e| format!("stdout flush failed: {e}"))
    }
}

/// Parse one console line into a session id and its event
pub fn parse_line(line: &str) -> Option<(String, InputEvent)> {
    let (session_id, rest) = line.trim().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }

    let event = match rest
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(token) => InputEvent::button(token),
        None => InputEvent::text(rest),
    };
    Some((session_id.to_string(), event))
}
