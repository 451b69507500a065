use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationErrors};

use super::filter::{visible_jobs, FilterSelection};
use super::models::{JobPatch, JobRecord, JobRecordInput};
use crate::id::IdSupplier;
use crate::storage::{JobRepository, Persistence, PersistenceError};

/// How many ids to request before giving up on an id supplier
const MAX_ID_ATTEMPTS: usize = 8;

/// Collection store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required field is missing or blank
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No record has the requested id
    #[error("job not found: {id}")]
    NotFound { id: String },

    /// The change is applied in memory but could not be saved
    #[error("failed to save jobs: {0}")]
    Persistence(#[from] PersistenceError),

    /// The id supplier kept returning empty or already used ids
    #[error("no unique job id after {attempts} attempts")]
    IdUnavailable { attempts: usize },
}

/// The single owner of the job collection.
///
/// Every successful mutation rewrites the whole collection to storage. When a write
/// fails the mutation stays applied in memory, the store is marked dirty and the
/// error is returned; [`JobStore::flush`] retries the write.
pub struct JobStore<P, I> {
    storage: P,
    ids: I,
    key: String,
    jobs: Vec<JobRecord>,
    dirty: bool,
}

impl<P: Persistence, I: IdSupplier> JobStore<P, I> {
    /// Create a store and restore whatever `storage` holds under `key`
    pub fn open(storage: P, ids: I, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            ids,
            key: key.into(),
            jobs: Vec::new(),
            dirty: false,
        };
        store.load_all();
        store
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Unreadable or malformed data yields an empty collection.
    pub fn load_all(&mut self) -> &[JobRecord] {
        self.jobs = JobRepository::load_all(&self.storage, &self.key);
        self.dirty = false;
        info!("Job store opened with {} jobs", self.jobs.len());
        &self.jobs
    }

    /// All records in insertion order
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// True when the last write failed and memory is ahead of storage
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Records matching `filter`, in collection order
    pub fn visible(&self, filter: FilterSelection) -> Vec<&JobRecord> {
        visible_jobs(&self.jobs, filter)
    }

    /// Append a new record with a fresh id
    ///
    /// # Returns
    /// - `Ok(JobRecord)` - the stored record
    /// - `Err(StoreError::Validation)` - nothing was added
    /// - `Err(StoreError::Persistence)` - added in memory only
    pub fn add(&mut self, input: JobRecordInput) -> Result<JobRecord, StoreError> {
        input.validate()?;

        let id = self.fresh_id()?;
        let record = input.into_record(id);
        self.jobs.push(record.clone());

        info!(
            "Added job id={} company={} status={}",
            record.id, record.company_name, record.status
        );

        self.persist()?;
        Ok(record)
    }

    /// Apply `patch` to the record with `id`; the id itself never changes
    pub fn update(&mut self, id: &str, patch: JobPatch) -> Result<JobRecord, StoreError> {
        patch.validate()?;

        let Some(record) = self.jobs.iter_mut().find(|job| job.id == id) else {
            warn!("Update of unknown job id={}", id);
            return Err(StoreError::NotFound { id: id.to_string() });
        };

        patch.apply_to(record);
        let updated = record.clone();
        info!("Updated job id={} status={}", updated.id, updated.status);

        self.persist()?;
        Ok(updated)
    }

    /// Remove the record with `id`, returning it.
    ///
    /// Removing an unknown id is a no-op and does not touch storage.
    pub fn remove(&mut self, id: &str) -> Result<Option<JobRecord>, StoreError> {
        let Some(position) = self.jobs.iter().position(|job| job.id == id) else {
            debug!("Remove of unknown job id={} ignored", id);
            return Ok(None);
        };

        let removed = self.jobs.remove(position);
        info!("Removed job id={}", removed.id);

        self.persist()?;
        Ok(Some(removed))
    }

    /// Retry saving after an earlier write failure
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    fn fresh_id(&mut self) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.new_id();
            if !id.trim().is_empty() && self.get(&id).is_none() {
                return Ok(id);
            }
            warn!("Id supplier returned unusable id {:?}", id);
        }
        Err(StoreError::IdUnavailable {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        match JobRepository::save_all(&mut self.storage, &self.key, &self.jobs) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                error!("Job list kept in memory only: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdSupplier;
    use crate::job::models::Status;
    use crate::storage::MemoryStorage;
    use std::collections::HashSet;

    /// Storage whose writes fail until switched back online
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        offline: bool,
    }

    impl Persistence for FlakyStorage {
        fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            if self.offline {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, raw: &str) -> Result<(), PersistenceError> {
            if self.offline {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            self.inner.write(key, raw)
        }
    }

    /// Always hands out the same id
    struct StuckIds;

    impl IdSupplier for StuckIds {
        fn new_id(&mut self) -> String {
            "job-1".to_string()
        }
    }

    fn store() -> JobStore<MemoryStorage, SequentialIdSupplier> {
        JobStore::open(MemoryStorage::new(), SequentialIdSupplier::default(), "jobList")
    }

    fn saab() -> JobRecordInput {
        JobRecordInput::new("Saab", "Front-end developer", "2025-09-15")
    }

    #[test]
    fn add_then_remove_returns_to_empty() {
        let mut store = store();

        let record = store.add(saab().with_status(Status::Applied)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!record.id.is_empty());
        assert_eq!(record.company_name, "Saab");
        assert_eq!(record.title, "Front-end developer");
        assert_eq!(record.date_applied, "2025-09-15");
        assert_eq!(record.status, Status::Applied);

        let removed = store.remove(&record.id).unwrap();
        assert_eq!(removed, Some(record));
        assert!(store.is_empty());
        assert_eq!(store.storage().get("jobList"), Some("[]"));
    }

    #[test]
    fn adds_get_unique_ids_and_keep_order() {
        let mut store = store();
        let companies = ["Saab", "Volvo", "Ericsson", "Spotify", "Klarna"];
        for company in companies {
            store
                .add(JobRecordInput::new(company, "Developer", "2025-09-15"))
                .unwrap();
        }

        assert_eq!(store.len(), companies.len());
        let ids: HashSet<&str> = store.jobs().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), companies.len());
        let order: Vec<&str> = store.jobs().iter().map(|j| j.company_name.as_str()).collect();
        assert_eq!(order, companies);
    }

    #[test]
    fn add_defaults_status_to_applied() {
        let mut store = store();
        let record = store.add(saab()).unwrap();
        assert_eq!(record.status, Status::Applied);
    }

    #[test]
    fn add_rejects_missing_fields_without_side_effects() {
        let mut store = store();
        let err = store
            .add(JobRecordInput::new("", "Developer", "2025-09-15"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.storage().get("jobList"), None);
    }

    #[test]
    fn add_skips_ids_already_in_use() {
        let mut store = JobStore::open(MemoryStorage::new(), StuckIds, "jobList");
        store.add(saab()).unwrap();
        let err = store.add(saab()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::IdUnavailable {
                attempts: MAX_ID_ATTEMPTS
            }
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut store = store();
        store.add(saab()).unwrap();
        let before = store.jobs().to_vec();

        assert_eq!(store.remove("missing").unwrap(), None);
        assert_eq!(store.jobs(), before.as_slice());
    }

    #[test]
    fn remove_keeps_order_of_remaining_records() {
        let mut store = store();
        let a = store.add(JobRecordInput::new("A", "Dev", "2025-01-01")).unwrap();
        let b = store.add(JobRecordInput::new("B", "Dev", "2025-01-02")).unwrap();
        let c = store.add(JobRecordInput::new("C", "Dev", "2025-01-03")).unwrap();

        store.remove(&b.id).unwrap();
        assert_eq!(store.jobs(), &[a, c][..]);
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let mut store = store();
        let original = store.add(saab().with_notes("via referral")).unwrap();

        let updated = store
            .update(
                &original.id,
                JobPatch {
                    status: Some(Status::Interviewing),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.status, Status::Interviewing);
        assert_eq!(updated.company_name, original.company_name);
        assert_eq!(updated.notes, original.notes);
        assert_eq!(store.get(&original.id), Some(&updated));
    }

    #[test]
    fn empty_patch_after_patch_changes_nothing() {
        let mut store = store();
        let id = store.add(saab()).unwrap().id;
        let patch = JobPatch {
            title: Some("Staff engineer".to_string()),
            status: Some(Status::Offered),
            ..Default::default()
        };

        let once = store.update(&id, patch).unwrap();
        let again = store.update(&id, JobPatch::default()).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = store();
        let err = store.update("missing", JobPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id } if id == "missing"));
    }

    #[test]
    fn update_rejects_blank_required_field() {
        let mut store = store();
        let record = store.add(saab()).unwrap();
        let err = store
            .update(
                &record.id,
                JobPatch {
                    company_name: Some("".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get(&record.id), Some(&record));
    }

    #[test]
    fn reopening_restores_persisted_collection() {
        let mut store = store();
        store.add(saab()).unwrap();
        store
            .add(JobRecordInput::new("Volvo", "Backend", "2025-09-20").with_status(Status::Rejected))
            .unwrap();
        let saved = store.jobs().to_vec();

        let storage = store.storage().clone();
        let reopened = JobStore::open(storage, SequentialIdSupplier::new("other"), "jobList");
        assert_eq!(reopened.jobs(), saved.as_slice());
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        let storage = MemoryStorage::new().with_value("jobList", "definitely not json");
        let store = JobStore::open(storage, SequentialIdSupplier::default(), "jobList");
        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_keeps_change_in_memory_until_flushed() {
        let mut store = JobStore::open(
            FlakyStorage {
                offline: true,
                ..Default::default()
            },
            SequentialIdSupplier::default(),
            "jobList",
        );
        assert!(store.is_empty());

        let err = store.add(saab()).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.len(), 1);
        assert!(store.is_dirty());

        store.storage.offline = false;
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(JobRepository::load_all(&store.storage, "jobList"), store.jobs());
    }

    #[test]
    fn flush_without_pending_changes_does_not_write() {
        let mut store = store();
        store.flush().unwrap();
        assert_eq!(store.storage().get("jobList"), None);
    }
}
