use std::fmt;
use std::str::FromStr;

use super::models::{JobRecord, Status, UnknownStatus};

/// Which records the job table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Status(Status),
}

impl FilterSelection {
    pub fn matches(self, job: &JobRecord) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Status(status) => job.status == status,
        }
    }
}

impl From<Option<Status>> for FilterSelection {
    fn from(status: Option<Status>) -> Self {
        status.map_or(FilterSelection::All, FilterSelection::Status)
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelection::All => f.write_str("all"),
            FilterSelection::Status(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Empty input and `all` mean no filter
impl FromStr for FilterSelection {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(FilterSelection::All);
        }
        s.parse().map(FilterSelection::Status)
    }
}

/// Project `jobs` through `filter`, keeping collection order
pub fn visible_jobs(jobs: &[JobRecord], filter: FilterSelection) -> Vec<&JobRecord> {
    jobs.iter().filter(|job| filter.matches(job)).collect()
}
