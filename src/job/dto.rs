use serde::Serialize;

use super::models::{JobRecord, Status};

/// Output of commands that touch a single job
#[derive(Serialize)]
pub struct JobResponse<'a> {
    pub message: String,
    pub job: &'a JobRecord,
}

/// The job table: visible rows plus the size of the whole collection
#[derive(Serialize)]
pub struct JobListResponse<'a> {
    pub filter: String,
    pub total: usize,
    pub jobs: Vec<&'a JobRecord>,
}

#[derive(Serialize)]
pub struct RemoveResponse {
    pub message: String,
    pub removed: Option<JobRecord>,
}

/// One row of the status lookup table
#[derive(Serialize)]
pub struct StatusEntry {
    pub label: &'static str,
    pub index: u8,
}

impl From<Status> for StatusEntry {
    fn from(status: Status) -> Self {
        Self {
            label: status.label(),
            index: status.index(),
        }
    }
}
