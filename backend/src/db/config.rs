//! Storage configuration and environment variable handling.

use std::env;
use std::path::PathBuf;

/// Default name of the persisted schedule blob.
pub const DEFAULT_STORE_FILE: &str = "tso-schedules.json";

/// File storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Location of the JSON blob holding all schedules
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
        }
    }
}

impl StorageConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a storage configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `SCHEDULE_STORE_PATH` (optional, default: `tso-schedules.json`): blob location
    ///
    /// # Errors
    /// Returns an error if the variable is set but empty.
    pub fn from_env() -> Result<Self, String> {
        match env::var("SCHEDULE_STORE_PATH") {
            Ok(path) if path.trim().is_empty() => {
                Err("SCHEDULE_STORE_PATH must not be empty".to_string())
            }
            Ok(path) => Ok(Self::new(path)),
            Err(_) => Ok(Self::default()),
        }
    }
}
