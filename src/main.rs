use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use job_tracker::cli::{self, Cli, CliError};
use job_tracker::config::Config;
use job_tracker::id::RandomIdSupplier;
use job_tracker::job::validation::ErrorResponse;
use job_tracker::job::JobStore;
use job_tracker::logging;
use job_tracker::storage::FileStorage;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Logging is best effort; the tracker works without it
    if let Err(e) = logging::init(&config.log_dir) {
        eprintln!("Logging disabled: {}", e);
    }

    let data_dir = cli.data_dir.clone().unwrap_or(config.data_dir);
    info!("Using job list `{}` in {}", config.storage_key, data_dir.display());

    let storage = FileStorage::new(data_dir);
    let mut store = JobStore::open(storage, RandomIdSupplier, config.storage_key);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli::run(cli.command, &mut store, cli.json, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Store(e)) => {
            error!("Command failed: {}", e);
            let response = ErrorResponse::from(&e);
            let rendered = if cli.json {
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| e.to_string())
            } else {
                format!("{}: {}", response.error, e)
            };
            let _ = out.flush();
            eprintln!("{}", rendered);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
