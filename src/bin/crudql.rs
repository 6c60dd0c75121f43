use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crudql::cli::Cli;

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries the status lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting crudql...");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match crudql::run(&cli, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("CRUD run aborted: {}", e);
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("    caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
