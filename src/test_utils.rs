//! Test fixtures shared by the unit tests.
//!
//! Each fixture owns a fresh SQLite file in its own temporary directory, so
//! tests never see each other's rows and the file is removed on drop.

use crate::core::db::ConnectionSettings;
use crate::core::Result;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

/// Schema the CRUD run expects. The program itself never creates it.
pub const RECORDS_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT
    );
";

/// A temporary database file holding the `users` table
pub struct RecordsFixture {
    _dir: TempDir,
    pub path: PathBuf,
    pub connection: Connection,
}

impl RecordsFixture {
    /// Creates an empty `users` table
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("records.db");
        let connection = Connection::open(&path)?;
        connection.execute_batch(RECORDS_SCHEMA)?;

        Ok(RecordsFixture {
            _dir: dir,
            path,
            connection,
        })
    }

    /// Creates the table and inserts `names` in order, so they get ids 1..=n
    pub fn with_names(names: &[&str]) -> Result<Self> {
        let fixture = Self::new()?;
        for name in names {
            fixture
                .connection
                .execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
        }
        Ok(fixture)
    }

    /// Settings that point a `Session` at this fixture's file
    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings::new(&self.path)
    }

    /// `(id, name)` pairs currently stored, ordered by id
    pub fn rows(&self) -> Vec<(i64, Option<String>)> {
        let mut stmt = self
            .connection
            .prepare("SELECT id, name FROM users ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_seeds_sequential_ids() {
        let fixture = RecordsFixture::with_names(&["Ada", "Grace"]).unwrap();
        assert_eq!(
            fixture.rows(),
            vec![(1, Some("Ada".to_string())), (2, Some("Grace".to_string()))]
        );
        assert!(fixture.path.is_file());
    }
}
