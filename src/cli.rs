use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Insert, list, update and delete a record in a SQLite table.
#[derive(Debug, Parser)]
#[command(name = "crudql", version, about)]
pub struct Cli {
    /// SQLite database file to run against (must already exist)
    pub database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Table holding the (id, name) records
    #[arg(short, long, value_name = "NAME")]
    pub table: Option<String>,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(table) = &self.table {
            config.database.table = table.clone();
        }
    }
}
