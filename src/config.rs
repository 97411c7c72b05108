//! Quest configuration
//!
//! Everything defaults to the built-in quest. A JSON file named by
//! `QUEST_CONFIG` replaces any field it sets.

pub mod builtin;

use crate::content::ContentEntry;
use crate::quiz::QuizQuestion;
use crate::route::Stage;
use crate::state_machine::StateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "QUEST_CONFIG";
pub const INTERVAL_VAR: &str = "QUEST_MSG_INTERVAL";
pub const DEFAULT_MSG_INTERVAL_SECS: f64 = 4.0;

/// Startup errors. Any of these keeps the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid message interval {0:?}: expected a non-negative number of seconds")]
    InvalidInterval(String),

    #[error("Route table for {0:?} is empty")]
    EmptyRouteTable(Stage),

    #[error("Invalid route {code:?} for {stage:?}: {reason}")]
    InvalidRoute {
        stage: Stage,
        code: String,
        reason: String,
    },

    #[error("Invalid delay {value} in script for {state:?}")]
    InvalidDelay { state: StateId, value: f64 },

    #[error("Quiz has no questions")]
    EmptyQuiz,

    #[error("Input {token} is accepted twice in state {state:?}")]
    OverlappingGuard { state: StateId, token: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    pub msg_interval_secs: f64,
    pub stage1_routes: BTreeMap<String, Vec<u8>>,
    pub stage2_routes: BTreeMap<String, Vec<u8>>,
    pub scripts: BTreeMap<StateId, Vec<ContentEntry>>,
    pub quiz: BTreeMap<String, QuizQuestion>,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestConfig {
    pub fn builtin() -> Self {
        Self {
            msg_interval_secs: DEFAULT_MSG_INTERVAL_SECS,
            stage1_routes: builtin::stage1_routes(),
            stage2_routes: builtin::stage2_routes(),
            scripts: builtin::scripts(),
            quiz: builtin::quiz(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let interval = std::env::var(INTERVAL_VAR).ok();
        Self::from_sources(path.as_deref(), interval.as_deref())
    }

    /// Built-in content, replaced by `path` if given, then the interval override
    pub fn from_sources(path: Option<&Path>, interval: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::builtin(),
        };
        if let Some(raw) = interval {
            config.msg_interval_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidInterval(raw.to_string()))?;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_without_sources() {
        let config = QuestConfig::from_sources(None, None).unwrap();
        assert_eq!(config, QuestConfig::builtin());
        assert!((config.msg_interval_secs - DEFAULT_MSG_INTERVAL_SECS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_file_falls_back_to_builtin() {
        let file = write_config(
            r#"{
                "msg_interval_secs": 0.5,
                "stage1_routes": {"1111": [4, 3, 2, 1, 0]},
                "scripts": {"awaiting_access_code": ["Привет!", 2, "Введите код"]}
            }"#,
        );
        let config = QuestConfig::load(file.path()).unwrap();

        assert!((config.msg_interval_secs - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.stage1_routes.len(), 1);
        assert_eq!(config.stage2_routes, builtin::stage2_routes());
        assert_eq!(config.quiz, builtin::quiz());
        assert_eq!(
            config.scripts[&StateId::AwaitingAccessCode],
            vec![
                ContentEntry::text("Привет!"),
                ContentEntry::Delay(2.0),
                ContentEntry::text("Введите код"),
            ]
        );
    }

    #[test]
    fn test_interval_override() {
        let config = QuestConfig::from_sources(None, Some(" 1.25 ")).unwrap();
        assert!((config.msg_interval_secs - 1.25).abs() < f64::EPSILON);

        let err = QuestConfig::from_sources(None, Some("soon")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval(_)));
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        let file = write_config("{ not json");
        assert!(matches!(
            QuestConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let file = write_config(r#"{"scripts": {"no_such_state": ["hi"]}}"#);
        assert!(matches!(
            QuestConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            QuestConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
