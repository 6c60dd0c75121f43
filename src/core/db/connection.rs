//! Connection Management Module
//!
//! Opens the single SQLite connection a CRUD run works on and tracks where the
//! run is in its linear lifecycle. The connection is owned by `Session`, so it
//! is released on every exit path, including early returns through `?`.

use crate::core::{CrudError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default busy timeout applied to every connection
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// SQLite takes the busy timeout as an `i32` of milliseconds
pub const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    /// Path to an existing SQLite database file
    pub path: PathBuf,
    /// How long SQLite waits on a locked database before giving up
    pub busy_timeout: Duration,
}

impl ConnectionSettings {
    /// Creates settings for the database at `path` with the default busy timeout
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConnectionSettings {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Overrides the busy timeout
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Lifecycle of a CRUD run.
///
/// The happy path is strictly linear:
/// `Disconnected -> Connected -> InsertDone -> ReadDone -> UpdateDone -> DeleteDone -> Disconnected`.
/// Any connected state may drop into `Failed`, which can only be left by disconnecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    InsertDone,
    ReadDone,
    UpdateDone,
    DeleteDone,
    Failed,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Disconnected
    }
}

impl SessionState {
    /// The state that follows this one on the happy path
    pub fn next(self) -> SessionState {
        match self {
            SessionState::Disconnected => SessionState::Connected,
            SessionState::Connected => SessionState::InsertDone,
            SessionState::InsertDone => SessionState::ReadDone,
            SessionState::ReadDone => SessionState::UpdateDone,
            SessionState::UpdateDone => SessionState::DeleteDone,
            SessionState::DeleteDone | SessionState::Failed => SessionState::Disconnected,
        }
    }

    /// Whether `to` is reachable from this state in one step
    pub fn can_transition_to(self, to: SessionState) -> bool {
        match to {
            SessionState::Failed => {
                !matches!(self, SessionState::Disconnected | SessionState::Failed)
            }
            _ => self.next() == to,
        }
    }
}

/// A single open connection plus the run state attached to it.
#[derive(Debug)]
pub struct Session {
    connection: Connection,
    label: String,
    state: SessionState,
}

impl Session {
    /// Opens an existing database read-write.
    ///
    /// The file is never created: a missing database counts as unreachable and
    /// fails here, before any statement runs.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Config` if the busy timeout is out of SQLite's range,
    /// and `CrudError::Database` if SQLite cannot open the file or apply it.
    pub fn open(settings: &ConnectionSettings) -> Result<Self> {
        if settings.busy_timeout.as_millis() > u128::from(MAX_BUSY_TIMEOUT_MS) {
            return Err(CrudError::Config(format!(
                "busy timeout of {} ms exceeds the maximum of {} ms",
                settings.busy_timeout.as_millis(),
                MAX_BUSY_TIMEOUT_MS
            )));
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let connection = Connection::open_with_flags(&settings.path, flags).map_err(|e| {
            warn!("Failed to open {}: {}", settings.path.display(), e);
            CrudError::Database(e)
        })?;
        connection.busy_timeout(settings.busy_timeout)?;

        info!("Connected to {}", settings.path.display());
        Ok(Session::from_connection(
            connection,
            settings.path.display().to_string(),
        ))
    }

    /// Wraps an already open connection, e.g. an in-memory database
    pub fn from_connection(connection: Connection, label: impl Into<String>) -> Self {
        Session {
            connection,
            label: label.into(),
            state: SessionState::Connected,
        }
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Human-readable name of the database this session is attached to
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Moves the run forward to `to`.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::State` when `to` is not the next step of the run.
    pub fn advance(&mut self, to: SessionState) -> Result<()> {
        if !self.state.can_transition_to(to) || to == SessionState::Disconnected {
            return Err(CrudError::State {
                from: self.state,
                to,
            });
        }
        debug!("{}: {:?} -> {:?}", self.label, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Marks the run as failed. The connection stays open until the session is dropped or closed.
    pub fn fail(&mut self) {
        if self.state.can_transition_to(SessionState::Failed) {
            debug!("{}: {:?} -> Failed", self.label, self.state);
            self.state = SessionState::Failed;
        }
    }

    /// Closes the connection, surfacing any error SQLite reports while doing so.
    ///
    /// Dropping a session also releases the connection; closing explicitly is
    /// only needed to observe close errors.
    pub fn close(self) -> Result<()> {
        let Session {
            connection,
            label,
            state,
        } = self;
        debug!("{}: {:?} -> Disconnected", label, state);
        connection.close().map_err(|(_, e)| CrudError::Database(e))?;
        info!("Disconnected from {}", label);
        Ok(())
    }
}

/// Returns true if `path` names a database `Session::open` could attach to.
pub fn database_exists(path: &Path) -> bool {
    path.is_file()
}
