//! Command line front end: parses form input, drives the store, renders the job table.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::id::IdSupplier;
use crate::job::dto::{JobListResponse, JobResponse, RemoveResponse, StatusEntry};
use crate::job::{
    EditSession, FilterSelection, JobRecord, JobRecordInput, JobStore, Status, StoreError,
};
use crate::storage::Persistence;

#[derive(Parser, Debug)]
#[command(name = "job-tracker", version, about = "Track job applications")]
pub struct Cli {
    /// Directory holding the job list (overrides JOB_TRACKER_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new application
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        title: String,
        /// Date applied, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Defaults to Applied
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the job table, optionally filtered by status
    List {
        /// A status name, or "all"
        #[arg(long, default_value = "all")]
        status: FilterSelection,
    },
    /// Show one application in full
    Show { id: String },
    /// Change fields of an application; without any field flags nothing is saved
    Edit {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
    },
    /// Delete an application
    Remove { id: String },
    /// List the known statuses
    Statuses,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Execute one command against `store`, writing results to `out`
pub fn run<P, I>(
    command: Command,
    store: &mut JobStore<P, I>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError>
where
    P: Persistence,
    I: IdSupplier,
{
    match command {
        Command::Add {
            company,
            title,
            date,
            status,
            notes,
        } => {
            let input = JobRecordInput {
                company_name: company,
                title,
                date_applied: format_date(date),
                status,
                notes,
            };
            let job = store.add(input)?;
            print_job(out, json, "Job added", &job)
        }
        Command::List { status } => {
            let jobs = store.visible(status);
            if json {
                let response = JobListResponse {
                    filter: status.to_string(),
                    total: store.len(),
                    jobs,
                };
                return print_json(out, &response);
            }
            write_table(out, &jobs)?;
            writeln!(
                out,
                "{} of {} jobs (filter: {})",
                jobs.len(),
                store.len(),
                status
            )?;
            Ok(())
        }
        Command::Show { id } => {
            let job = store
                .get(&id)
                .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
            print_job(out, json, "Job found", job)
        }
        Command::Edit {
            id,
            company,
            title,
            date,
            status,
            notes,
            clear_notes,
        } => {
            let record = store
                .get(&id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

            let mut session = EditSession::default();
            session.begin(&record);
            if let Some(draft) = session.draft_mut() {
                if let Some(company) = company {
                    draft.company_name = company;
                }
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(date) = date {
                    draft.date_applied = format_date(date);
                }
                if let Some(status) = status {
                    draft.status = status;
                }
                if notes.is_some() || clear_notes {
                    draft.notes = notes;
                }
            }

            let unchanged = session
                .draft()
                .map_or(true, |draft| draft.changes_from(&record).is_empty());
            if unchanged {
                session.cancel();
                return print_job(out, json, "Nothing to change", &record);
            }

            match session.submit(store)? {
                Some(job) => print_job(out, json, "Job updated", &job),
                None => Ok(()),
            }
        }
        Command::Remove { id } => {
            let removed = store.remove(&id)?;
            let message = match &removed {
                Some(job) => format!("Removed {} at {}", job.title, job.company_name),
                None => format!("No job with id {}, nothing removed", id),
            };
            if json {
                return print_json(out, &RemoveResponse { message, removed });
            }
            writeln!(out, "{}", message)?;
            Ok(())
        }
        Command::Statuses => {
            if json {
                let entries: Vec<StatusEntry> =
                    Status::ALL.into_iter().map(StatusEntry::from).collect();
                return print_json(out, &entries);
            }
            for status in Status::ALL {
                writeln!(out, "{}  {}", status.index(), status)?;
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_job(out: &mut dyn Write, json: bool, message: &str, job: &JobRecord) -> Result<(), CliError> {
    if json {
        return print_json(
            out,
            &JobResponse {
                message: message.to_string(),
                job,
            },
        );
    }

    writeln!(out, "{}", message)?;
    writeln!(out, "  Id:           {}", job.id)?;
    writeln!(out, "  Company:      {}", job.company_name)?;
    writeln!(out, "  Title:        {}", job.title)?;
    writeln!(out, "  Date Applied: {}", job.date_applied)?;
    writeln!(out, "  Status:       {}", job.status)?;
    if let Some(notes) = &job.notes {
        writeln!(out, "  Notes:        {}", notes)?;
    }
    Ok(())
}

const HEADERS: [&str; 5] = ["Id", "Company", "Title", "Date Applied", "Status"];

fn write_table(out: &mut dyn Write, jobs: &[&JobRecord]) -> io::Result<()> {
    let rows: Vec<[&str; 5]> = jobs
        .iter()
        .map(|job| {
            [
                job.id.as_str(),
                job.company_name.as_str(),
                job.title.as_str(),
                job.date_applied.as_str(),
                job.status.label(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("  "))?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut dyn Write, cells: &[&str; 5], widths: &[usize; 5]) -> io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}
