use std::collections::HashSet;

use tracing::{debug, warn};

use super::{Persistence, PersistenceError};
use crate::job::models::JobRecord;

/// Why a stored job list could not be used
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed job list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("job at position {index} has no id")]
    MissingId { index: usize },
}

/// Reads and writes the full job collection under one storage key
pub struct JobRepository;

impl JobRepository {
    /// Load the stored collection.
    ///
    /// Never fails: an absent key, an unreadable backend or a malformed value all
    /// yield an empty collection, logged at warn level.
    pub fn load_all<P: Persistence + ?Sized>(storage: &P, key: &str) -> Vec<JobRecord> {
        let raw = match storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No job list stored under `{}`, starting empty", key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Could not read job list, starting empty: {}", e);
                return Vec::new();
            }
        };

        match Self::decode(&raw) {
            Ok(jobs) => {
                debug!("Loaded {} jobs from `{}`", jobs.len(), key);
                jobs
            }
            Err(e) => {
                warn!("Discarding stored job list under `{}`: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Decode a stored value, keeping the first record for any repeated id
    pub fn decode(raw: &str) -> Result<Vec<JobRecord>, DecodeError> {
        let records: Vec<JobRecord> = serde_json::from_str(raw)?;
        let mut seen = HashSet::with_capacity(records.len());
        let mut jobs = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(DecodeError::MissingId { index });
            }
            if !seen.insert(record.id.clone()) {
                warn!("Dropping duplicate job id {} at position {}", record.id, index);
                continue;
            }
            jobs.push(record);
        }

        Ok(jobs)
    }

    pub fn encode(jobs: &[JobRecord]) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(jobs)?)
    }

    /// Replace the stored collection with `jobs`
    pub fn save_all<P: Persistence + ?Sized>(
        storage: &mut P,
        key: &str,
        jobs: &[JobRecord],
    ) -> Result<(), PersistenceError> {
        let raw = Self::encode(jobs)?;
        storage.write(key, &raw)?;
        debug!("Saved {} jobs under `{}`", jobs.len(), key);
        Ok(())
    }
}
