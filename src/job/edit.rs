use std::mem;

use tracing::debug;

use super::models::{JobPatch, JobRecord, Status};
use super::store::{JobStore, StoreError};
use crate::id::IdSupplier;
use crate::storage::Persistence;

/// Editable copy of a record's fields; the id is not part of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub company_name: String,
    pub title: String,
    pub date_applied: String,
    pub status: Status,
    pub notes: Option<String>,
}

impl From<&JobRecord> for JobDraft {
    fn from(record: &JobRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            title: record.title.clone(),
            date_applied: record.date_applied.clone(),
            status: record.status,
            notes: record.notes.clone(),
        }
    }
}

impl JobDraft {
    /// Patch holding only the fields that differ from `original`
    pub fn changes_from(&self, original: &JobRecord) -> JobPatch {
        fn changed<T: Clone + PartialEq>(draft: &T, original: &T) -> Option<T> {
            (draft != original).then(|| draft.clone())
        }

        JobPatch {
            company_name: changed(&self.company_name, &original.company_name),
            title: changed(&self.title, &original.title),
            date_applied: changed(&self.date_applied, &original.date_applied),
            status: changed(&self.status, &original.status),
            notes: changed(&self.notes, &original.notes),
        }
    }
}

/// The record currently open in the edit form, if any.
///
/// Changes go to the draft only; the collection is untouched until [`EditSession::submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        original: JobRecord,
        draft: JobDraft,
    },
}

impl EditSession {
    /// Open `record` for editing, discarding any draft already open
    pub fn begin(&mut self, record: &JobRecord) {
        debug!("Editing job id={}", record.id);
        *self = EditSession::Editing {
            original: record.clone(),
            draft: JobDraft::from(record),
        };
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    /// Id of the record being edited
    pub fn target(&self) -> Option<&str> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { original, .. } => Some(&original.id),
        }
    }

    pub fn draft(&self) -> Option<&JobDraft> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut JobDraft> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft, .. } => Some(draft),
        }
    }

    /// Close the form without saving, returning the discarded draft
    pub fn cancel(&mut self) -> Option<JobDraft> {
        match mem::take(self) {
            EditSession::Idle => None,
            EditSession::Editing { original, draft } => {
                debug!("Discarded edit of job id={}", original.id);
                Some(draft)
            }
        }
    }

    /// Commit the draft's changes through `store`.
    ///
    /// Returns `Ok(None)` when no edit was open. A validation failure keeps the
    /// session open so the form can show the error; any other outcome closes it.
    pub fn submit<P, I>(
        &mut self,
        store: &mut JobStore<P, I>,
    ) -> Result<Option<JobRecord>, StoreError>
    where
        P: Persistence,
        I: IdSupplier,
    {
        let (original, draft) = match mem::take(self) {
            EditSession::Idle => return Ok(None),
            EditSession::Editing { original, draft } => (original, draft),
        };

        match store.update(&original.id, draft.changes_from(&original)) {
            Ok(updated) => Ok(Some(updated)),
            Err(err @ StoreError::Validation(_)) => {
                *self = EditSession::Editing { original, draft };
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
