//! Mock transport for testing
//!
//! Records every delivery with the (possibly paused) tokio clock so tests can
//! check ordering and pacing without real waiting.

use super::traits::Transport;
use crate::content::OutboundItem;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Delivery {
    pub session_id: String,
    pub item: OutboundItem,
    pub at: Instant,
}

/// Transport that sleeps for waits and records everything else
#[derive(Debug, Default)]
pub struct RecordingTransport {
    deliveries: Mutex<Vec<Delivery>>,
    failures_left: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` non-wait deliveries
    pub fn failing_first(count: usize) -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            failures_left: AtomicUsize::new(count),
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Texts shown to one session, in order
    pub fn texts_for(&self, session_id: &str) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.session_id == session_id)
            .filter_map(|d| match d.item {
                OutboundItem::EmitText(text) | OutboundItem::Prompt { text, .. } => Some(text),
                OutboundItem::Wait(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(&self, session_id: &str, item: &OutboundItem) -> Result<(), String> {
        if let OutboundItem::Wait(duration) = item {
            tokio::time::sleep(*duration).await;
        } else if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err("transport unavailable".to_string());
        }

        self.deliveries.lock().unwrap().push(Delivery {
            session_id: session_id.to_string(),
            item: item.clone(),
            at: Instant::now(),
        });
        Ok(())
    }
}
