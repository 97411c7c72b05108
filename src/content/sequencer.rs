//! Content sequencer
//!
//! Describes timing only. A `Wait` is emitted between two texts: the default
//! interval, or an explicit delay entry that sits between them. The sequencer
//! never sleeps itself.

use super::{ContentEntry, ContentScripts, OutboundItem};
use crate::state_machine::StateId;
use std::time::Duration;

/// Plays content scripts with a default inter-message interval
#[derive(Debug, Clone, Copy)]
pub struct Sequencer<'a> {
    scripts: &'a ContentScripts,
    interval: Duration,
}

impl<'a> Sequencer<'a> {
    pub fn new(scripts: &'a ContentScripts, interval: Duration) -> Self {
        Self { scripts, interval }
    }

    /// Start an independent playback of the script for `state`.
    ///
    /// A state without a script plays nothing.
    pub fn play(&self, state: StateId) -> Playback<'a> {
        Playback::new(self.scripts.get(state).unwrap_or_default(), self.interval)
    }
}

/// Lazy, finite stream of outbound items for one script
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    entries: std::slice::Iter<'a, ContentEntry>,
    interval: Duration,
    previous_was_text: bool,
    pending_delay: Option<Duration>,
    queued_text: Option<&'a str>,
}

impl<'a> Playback<'a> {
    pub fn new(entries: &'a [ContentEntry], interval: Duration) -> Self {
        Self {
            entries: entries.iter(),
            interval,
            previous_was_text: false,
            pending_delay: None,
            queued_text: None,
        }
    }
}

impl Iterator for Playback<'_> {
    type Item = OutboundItem;

    fn next(&mut self) -> Option<OutboundItem> {
        if let Some(text) = self.queued_text.take() {
            return Some(OutboundItem::EmitText(text.to_string()));
        }

        loop {
            match self.entries.next()? {
                ContentEntry::Delay(secs) => {
                    // Only a delay directly after a text counts
                    if self.previous_was_text {
                        self.pending_delay = Some(delay_duration(*secs));
                    }
                    self.previous_was_text = false;
                }
                ContentEntry::Text(text) => {
                    let wait = if self.previous_was_text {
                        Some(self.interval)
                    } else {
                        self.pending_delay.take()
                    };
                    self.previous_was_text = true;

                    return Some(match wait {
                        Some(duration) => {
                            self.queued_text = Some(text.as_str());
                            OutboundItem::Wait(duration)
                        }
                        None => OutboundItem::EmitText(text.clone()),
                    });
                }
            }
        }
    }
}

/// Convert a delay in seconds, clamping values `Duration` cannot hold to zero
pub fn delay_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_default()
}
