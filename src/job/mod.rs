pub mod dto;
pub mod edit;
pub mod filter;
pub mod models;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use edit::{EditSession, JobDraft};
pub use filter::{visible_jobs, FilterSelection};
pub use models::{JobPatch, JobRecord, JobRecordInput, Status};
pub use store::{JobStore, StoreError};
