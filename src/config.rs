use std::env;
use std::path::PathBuf;

use crate::storage::{validate_key, DEFAULT_STORAGE_KEY};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the stored job list
    /// Default: data
    pub data_dir: PathBuf,

    /// Storage key the job list is kept under
    /// Default: jobList
    pub storage_key: String,

    /// Directory for rolling log files
    /// Default: logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - JOB_TRACKER_DATA_DIR: where the job list is stored (default: data)
    /// - JOB_TRACKER_STORAGE_KEY: key of the job list (default: jobList)
    /// - LOG_DIR: log file directory (default: logs)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let data_dir = lookup("JOB_TRACKER_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "data".to_string());

        let storage_key = lookup("JOB_TRACKER_STORAGE_KEY")
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        validate_key(&storage_key).map_err(|e| format!("JOB_TRACKER_STORAGE_KEY: {}", e))?;

        let log_dir = lookup("LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "logs".to_string());

        Ok(Config {
            data_dir: data_dir.into(),
            storage_key,
            log_dir: log_dir.into(),
        })
    }
}
