//! Single-user job application tracker.
//!
//! [`job::JobStore`] owns the collection and persists it through a
//! [`storage::Persistence`] backend after every change; [`job::visible_jobs`]
//! derives the filtered table from it.

pub mod cli;
pub mod config;
pub mod id;
pub mod job;
pub mod logging;
pub mod storage;
