//! Record Statements Module
//!
//! The four statements of a CRUD run against a table of `(id, name)` rows.
//! Values are always bound as parameters; only the table name is spliced into
//! the SQL text, and only after it has been checked to be a plain identifier.

use crate::core::{CrudError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use std::fmt;
use tracing::debug;

/// Table used when none is configured
pub const DEFAULT_TABLE: &str = "users";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").unwrap());

/// A validated table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Validates `name` as an unquoted SQL identifier.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::InvalidIdentifier` for anything other than ASCII
    /// letters, digits and underscores (not starting with a digit, at most 64 chars).
    pub fn new(name: &str) -> Result<Self> {
        if IDENTIFIER.is_match(name) {
            Ok(TableName(name.to_string()))
        } else {
            Err(CrudError::InvalidIdentifier(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        TableName(DEFAULT_TABLE.to_string())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// One row of the records table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Assigned by the database on insert
    pub id: i64,
    pub name: Option<String>,
}

impl Record {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Record {
            id: row.get("id")?,
            name: render_value(row.get_ref("name")?),
        })
    }
}

/// SQLite does not enforce column types, so whatever sits in `name` is
/// rendered as text rather than failing the scan.
fn render_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(format!("<BLOB: {} bytes>", b.len())),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}",
            self.id,
            self.name.as_deref().unwrap_or("NULL")
        )
    }
}

/// Statement runner bound to one connection and one table.
pub struct RecordStore<'a> {
    connection: &'a Connection,
    table: &'a TableName,
}

impl<'a> RecordStore<'a> {
    pub fn new(connection: &'a Connection, table: &'a TableName) -> Self {
        RecordStore { connection, table }
    }

    /// Inserts a row with the given name and returns the affected-row count.
    /// The id is left to the database.
    pub fn insert(&self, name: &str) -> Result<usize> {
        let sql = format!("INSERT INTO {} (name) VALUES (?1)", self.table);
        let mut stmt = self.connection.prepare(&sql)?;
        let affected = stmt.execute(params![name])?;
        debug!("insert into {}: {} row(s)", self.table, affected);
        Ok(affected)
    }

    /// Streams every row of the table through `visit`, in the order SQLite
    /// returns them, and returns how many rows were visited.
    ///
    /// Rows are read one at a time from the cursor; nothing is buffered. The
    /// first error from either SQLite or `visit` stops the scan.
    pub fn for_each<F>(&self, mut visit: F) -> Result<usize>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let sql = format!("SELECT id, name FROM {}", self.table);
        let mut stmt = self.connection.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut visited = 0;
        while let Some(row) = rows.next()? {
            visit(Record::from_row(row)?)?;
            visited += 1;
        }
        debug!("select from {}: {} row(s)", self.table, visited);
        Ok(visited)
    }

    /// Collects every row of the table
    pub fn all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        self.for_each(|record| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }

    /// Renames the row with the given id and returns the affected-row count
    pub fn update_name(&self, id: i64, name: &str) -> Result<usize> {
        let sql = format!("UPDATE {} SET name = ?1 WHERE id = ?2", self.table);
        let mut stmt = self.connection.prepare(&sql)?;
        let affected = stmt.execute(params![name, id])?;
        debug!("update {} id={}: {} row(s)", self.table, id, affected);
        Ok(affected)
    }

    /// Deletes the row with the given id and returns the affected-row count
    pub fn delete(&self, id: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table);
        let mut stmt = self.connection.prepare(&sql)?;
        let affected = stmt.execute(params![id])?;
        debug!("delete from {} id={}: {} row(s)", self.table, id, affected);
        Ok(affected)
    }

    /// Number of rows currently in the table
    pub fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count = self.connection.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Id of the most recent successful insert on this connection
    pub fn last_insert_id(&self) -> i64 {
        self.connection.last_insert_rowid()
    }
}
