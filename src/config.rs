use crate::core::db::{
    ConnectionSettings, TableName, DEFAULT_BUSY_TIMEOUT, DEFAULT_TABLE, MAX_BUSY_TIMEOUT_MS,
};
use crate::core::{CrudError, Result};
use crate::crud::CrudPlan;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// File name looked up in the working directory when no config is given
pub const LOCAL_CONFIG_FILE: &str = "crudql.toml";

/// Top-level configuration structure parsed from a TOML file.
///
/// Every section and key is optional; anything left out falls back to the
/// built-in literals.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub crud: CrudConfig,
}

/// Database connection configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub table: String,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("crudql.db"),
            table: DEFAULT_TABLE.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
        }
    }
}

/// Values bound into the CRUD statements.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrudConfig {
    pub insert_name: String,
    pub update_name: String,
    pub target_id: i64,
}

impl Default for CrudConfig {
    fn default() -> Self {
        let plan = CrudPlan::default();
        CrudConfig {
            insert_name: plan.insert_name,
            update_name: plan.update_name,
            target_id: plan.target_id,
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config found in the
    /// usual places, otherwise the defaults.
    ///
    /// Lookup order without an explicit path: `./crudql.toml`, then
    /// `<config dir>/crudql/config.toml`.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return load_config(path);
        }

        let candidates = [
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            dirs::config_dir().map(|dir| dir.join("crudql").join("config.toml")),
        ];
        for candidate in candidates.into_iter().flatten() {
            if candidate.is_file() {
                return load_config(candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Builds the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Config` if `busy_timeout_ms` is larger than SQLite
    /// accepts (`i32::MAX` milliseconds).
    pub fn connection_settings(&self) -> Result<ConnectionSettings> {
        if self.database.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(CrudError::Config(format!(
                "busy_timeout_ms = {} exceeds the maximum of {}",
                self.database.busy_timeout_ms, MAX_BUSY_TIMEOUT_MS
            )));
        }
        Ok(ConnectionSettings::new(&self.database.path)
            .with_busy_timeout(Duration::from_millis(self.database.busy_timeout_ms)))
    }

    /// Builds the run plan, validating the configured table name
    pub fn plan(&self) -> Result<CrudPlan> {
        Ok(CrudPlan {
            table: TableName::new(&self.database.table)?,
            insert_name: self.crud.insert_name.clone(),
            update_name: self.crud.update_name.clone(),
            target_id: self.crud.target_id,
        })
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Errors
///
/// Returns `CrudError::Config` if the file cannot be read or is not valid TOML
/// for this schema.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path)
        .map_err(|e| CrudError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| CrudError::Config(format!("{}: {}", path.display(), e)))
}
