//! Runtime configuration read from the environment.
//!
//! | Variable                  | Meaning                              | Default   |
//! |---------------------------|--------------------------------------|-----------|
//! | `KANBAN_USE_REMOTE`       | `1` or `true` selects remote mode    | local     |
//! | `KANBAN_BOARD_ID`         | board scoping every remote record    | `default` |
//! | `KANBAN_DATA_DIR`         | directory for local records          | `.kanban` |
//! | `KANBAN_DATABASE_URL`     | `PostgreSQL` URL, remote mode only   | required  |
//! | `KANBAN_POLL_INTERVAL_MS` | realtime polling period, remote only | `1000`    |

use crate::board::domain::{BoardDomainError, BoardId};
use std::time::Duration;
use thiserror::Error;

/// Selects remote mode.
pub const USE_REMOTE_VAR: &str = "KANBAN_USE_REMOTE";
/// Board identifier.
pub const BOARD_ID_VAR: &str = "KANBAN_BOARD_ID";
/// Local data directory.
pub const DATA_DIR_VAR: &str = "KANBAN_DATA_DIR";
/// Remote database URL.
pub const DATABASE_URL_VAR: &str = "KANBAN_DATABASE_URL";
/// Remote polling period in milliseconds.
pub const POLL_INTERVAL_VAR: &str = "KANBAN_POLL_INTERVAL_MS";

/// Local data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = ".kanban";
/// Polling period used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Where board items are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Whole-board snapshots in the local data directory.
    Local,
    /// Per-item documents in `PostgreSQL`.
    Remote {
        /// Connection URL.
        database_url: String,
        /// Realtime polling period.
        poll_interval: Duration,
    },
}

/// Validated board configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    board_id: BoardId,
    data_dir: String,
    backend: BackendConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A boolean variable holds something other than `0`, `1`, `true` or
    /// `false`.
    #[error("{var} must be 0, 1, true or false, got '{value}'")]
    InvalidFlag {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// The board identifier is blank or contains `/`.
    #[error("invalid KANBAN_BOARD_ID: {0}")]
    InvalidBoardId(#[source] BoardDomainError),

    /// The data directory is blank.
    #[error("KANBAN_DATA_DIR must not be empty")]
    EmptyDataDir,

    /// Remote mode was selected without a database URL.
    #[error("KANBAN_DATABASE_URL is required when KANBAN_USE_REMOTE is set")]
    MissingDatabaseUrl,

    /// The polling period is not a positive integer.
    #[error("KANBAN_POLL_INTERVAL_MS must be a positive number of milliseconds, got '{0}'")]
    InvalidPollInterval(String),
}

impl BoardConfig {
    /// Creates a local-mode configuration.
    #[must_use]
    pub fn local(board_id: BoardId, data_dir: impl Into<String>) -> Self {
        Self {
            board_id,
            data_dir: data_dir.into(),
            backend: BackendConfig::Local,
        }
    }

    /// Switches to remote mode.
    #[must_use]
    pub fn with_remote(mut self, database_url: impl Into<String>, poll_interval: Duration) -> Self {
        self.backend = BackendConfig::Remote {
            database_url: database_url.into(),
            poll_interval,
        };
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let board_id = match read(BOARD_ID_VAR) {
            Some(raw) => BoardId::new(raw).map_err(ConfigError::InvalidBoardId)?,
            None => BoardId::default(),
        };
        let data_dir = lookup(DATA_DIR_VAR).unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        let config = Self::local(board_id, data_dir);
        if !parse_flag(USE_REMOTE_VAR, read(USE_REMOTE_VAR))? {
            return Ok(config);
        }
        let database_url = read(DATABASE_URL_VAR).ok_or(ConfigError::MissingDatabaseUrl)?;
        let poll_interval = match read(POLL_INTERVAL_VAR) {
            Some(raw) => parse_interval(&raw)?,
            None => DEFAULT_POLL_INTERVAL,
        };
        Ok(config.with_remote(database_url, poll_interval))
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    /// Returns the local data directory.
    #[must_use]
    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }

    /// Returns the backend selection.
    #[must_use]
    pub const fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// Returns `true` in remote mode.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self.backend, BackendConfig::Remote { .. })
    }
}

fn parse_flag(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value }),
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    raw.parse::<u64>()
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| ConfigError::InvalidPollInterval(raw.to_owned()))
}
