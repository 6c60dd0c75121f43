//! Error types for crudql.
//!
//! Every database call funnels into a single `CrudError::Database` kind that
//! carries the native SQLite diagnostic. The remaining variants cover the
//! plumbing around the CRUD run: configuration, identifiers, output and the
//! session lifecycle.
use thiserror::Error;

use crate::core::db::SessionState;

/// Error type shared by the whole crate.
#[derive(Error, Debug)]
pub enum CrudError {
    /// Connect-time or statement failure reported by SQLite
    #[error("Database operation failed: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table names are spliced into SQL text, so they must be plain identifiers
    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Writing status lines failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session was asked to move to a state it cannot reach
    #[error("Invalid session transition: {from:?} -> {to:?}")]
    State { from: SessionState, to: SessionState },
}

/// Type alias for Result to use CrudError as the error type.
pub type Result<T> = std::result::Result<T, CrudError>;
