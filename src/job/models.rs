use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

use super::validation::not_blank;

/// Lifecycle stage of a job application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

/// Status lookup table: variant, display label, legacy backing index.
///
/// Rows are ordered by discriminant so `STATUS_TABLE[status as usize]` is the row for `status`.
const STATUS_TABLE: [(Status, &str, u8); 4] = [
    (Status::Applied, "Applied", 0),
    (Status::Interviewing, "Interviewing", 1),
    (Status::Offered, "Offered", 2),
    (Status::Rejected, "Rejected", 3),
];

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Applied,
        Status::Interviewing,
        Status::Offered,
        Status::Rejected,
    ];

    /// Display label, also the persisted form
    pub fn label(self) -> &'static str {
        STATUS_TABLE[self as usize].1
    }

    /// Backing index used by older stored data
    pub fn index(self) -> u8 {
        STATUS_TABLE[self as usize].2
    }

    /// Case-insensitive label lookup (accepts `InterViewing` from older data)
    pub fn from_label(label: &str) -> Option<Status> {
        let label = label.trim();
        STATUS_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(label))
            .map(|(status, _, _)| *status)
    }

    pub fn from_index(index: u8) -> Option<Status> {
        STATUS_TABLE
            .iter()
            .find(|(_, _, i)| *i == index)
            .map(|(status, _, _)| *status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status `{0}`, expected one of Applied, Interviewing, Offered, Rejected")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_label(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Name(String),
    Index(u8),
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match StatusRepr::deserialize(deserializer)? {
            StatusRepr::Name(name) => Status::from_label(&name)
                .ok_or_else(|| de::Error::custom(UnknownStatus(name))),
            StatusRepr::Index(index) => Status::from_index(index)
                .ok_or_else(|| de::Error::custom(format!("unknown status index {}", index))),
        }
    }
}

/// One tracked job application, as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub company_name: String,
    pub title: String,
    /// ISO-8601 calendar date
    pub date_applied: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Field values for a new job record, as supplied by the form layer
#[derive(Debug, Clone, Default, Validate)]
pub struct JobRecordInput {
    #[validate(custom(function = "not_blank", message = "Company name is required"))]
    pub company_name: String,

    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Date applied is required"))]
    pub date_applied: String,

    /// Defaults to `Status::Applied`
    pub status: Option<Status>,

    pub notes: Option<String>,
}

impl JobRecordInput {
    pub fn new(
        company_name: impl Into<String>,
        title: impl Into<String>,
        date_applied: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            title: title.into(),
            date_applied: date_applied.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub(crate) fn into_record(self, id: String) -> JobRecord {
        JobRecord {
            id,
            company_name: self.company_name,
            title: self.title,
            date_applied: self.date_applied,
            status: self.status.unwrap_or_default(),
            notes: normalize_notes(self.notes),
        }
    }
}

/// Partial update: `None` leaves a field untouched.
///
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct JobPatch {
    #[validate(custom(function = "not_blank", message = "Company name is required"))]
    pub company_name: Option<String>,

    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank", message = "Date applied is required"))]
    pub date_applied: Option<String>,

    pub status: Option<Status>,

    pub notes: Option<Option<String>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self == &JobPatch::default()
    }

    pub(crate) fn apply_to(self, record: &mut JobRecord) {
        if let Some(company_name) = self.company_name {
            record.company_name = company_name;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(date_applied) = self.date_applied {
            record.date_applied = date_applied;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(notes) = self.notes {
            record.notes = normalize_notes(notes);
        }
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}
