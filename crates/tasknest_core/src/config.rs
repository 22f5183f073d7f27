//! Runtime configuration for embedding hosts.
//!
//! Values come from environment variables; blank values count as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Database file location.
pub const DB_PATH_ENV: &str = "TASKNEST_DB_PATH";
/// Log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "TASKNEST_LOG_LEVEL";
/// Absolute log directory. Logging stays off when unset.
pub const LOG_DIR_ENV: &str = "TASKNEST_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tasknest.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
