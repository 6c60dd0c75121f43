// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod cli;
pub mod config;
pub mod crud;

#[cfg(test)]
mod test_utils;

use std::io::Write;
use tracing::warn;

use crate::cli::Cli;
use crate::config::Config;
use crate::core::db::database_exists;
use crate::core::Result;
use crate::crud::CrudReport;

/// Loads configuration, applies command-line overrides and performs one CRUD run.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<CrudReport> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let plan = config.plan()?;
    let settings = config.connection_settings()?;
    if !database_exists(&settings.path) {
        warn!("{} does not exist; it will not be created", settings.path.display());
    }

    crud::run_crud(&settings, &plan, out)
}
