//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings with stable defaults.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - An explicitly set but unknown log level is an error, not a fallback.

use crate::logging::{default_log_level, parse_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PHONEBOOK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PHONEBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PHONEBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "phonebook.sqlite3";

/// Configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(level) => {
                write!(f, "{LOG_LEVEL_ENV}=`{level}` is not a known log level")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, one call per variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(level) => match parse_level(&level) {
                Ok(normalized) => normalized.to_string(),
                Err(_) => return Err(ConfigError::InvalidLogLevel(level)),
            },
            None => default_log_level().to_string(),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        })
    }
}
