//! Key-value persistence for the job collection.
//!
//! The tracker keeps its whole collection under a single key, the way a browser
//! keeps an app's state in local storage. Backends only move raw strings; encoding
//! lives in [`JobRepository`].

pub mod file;
pub mod job_repository;
pub mod memory;

pub use file::FileStorage;
pub use job_repository::JobRepository;
pub use memory::MemoryStorage;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "jobList";

/// Storage read/write failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode job list: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A raw key-value store
pub trait Persistence {
    /// Returns `Ok(None)` when nothing has been stored under `key` yet
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&mut self, key: &str, raw: &str) -> Result<(), PersistenceError>;
}

impl<T: Persistence + ?Sized> Persistence for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), PersistenceError> {
        (**self).write(key, raw)
    }
}

/// Keys double as file names, so they must be non-empty and free of path separators
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("storage key must not be empty".to_string());
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(format!("storage key `{}` must not contain path separators", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_rejects_paths() {
        assert!(validate_key(DEFAULT_STORAGE_KEY).is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../jobs").is_err());
        assert!(validate_key("a\\b").is_err());
        assert!(validate_key("..").is_err());
    }
}
