//! Immutable quest catalog
//!
//! Built once at startup from a validated [`QuestConfig`] and shared behind
//! an `Arc` for the life of the process.

use crate::config::{ConfigError, QuestConfig};
use crate::content::{ContentEntry, ContentScripts, Sequencer};
use crate::quiz::QuizBank;
use crate::route::{RouteBook, RouteTable, Stage};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub interval: Duration,
    pub routes: RouteBook,
    pub scripts: ContentScripts,
    pub quiz: QuizBank,
}

impl Catalog {
    pub fn from_config(config: QuestConfig) -> Result<Self, ConfigError> {
        let secs = config.msg_interval_secs;
        let interval = Duration::try_from_secs_f64(secs)
            .map_err(|_| ConfigError::InvalidInterval(secs.to_string()))?;

        let routes = RouteBook::new(
            RouteTable::from_numbers(Stage::Stage1, &config.stage1_routes)?,
            RouteTable::from_numbers(Stage::Stage2, &config.stage2_routes)?,
        );

        for (state, entries) in &config.scripts {
            for entry in entries {
                if let ContentEntry::Delay(value) = *entry {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ConfigError::InvalidDelay {
                            state: *state,
                            value,
                        });
                    }
                }
            }
        }

        if config.quiz.is_empty() {
            return Err(ConfigError::EmptyQuiz);
        }

        Ok(Self {
            interval,
            routes,
            scripts: ContentScripts::new(config.scripts.into_iter().collect()),
            quiz: QuizBank::new(config.quiz),
        })
    }

    #[cfg(test)]
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_config(QuestConfig::builtin())
    }

    pub fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(&self.scripts, self.interval)
    }
}
