#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

/// A `users` table in a fresh database file inside its own temp directory.
pub struct TestDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

pub fn setup_db(names: &[&str]) -> TestDb {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("people.db");
    let conn = Connection::open(&path).expect("open test db");
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT
        );",
    )
    .expect("create users table");
    for name in names {
        conn.execute("INSERT INTO users (name) VALUES (?1)", params![name])
            .expect("seed users");
    }
    TestDb { dir, path }
}

impl TestDb {
    pub fn rows(&self) -> Vec<(i64, Option<String>)> {
        let conn = Connection::open(&self.path).expect("reopen test db");
        let mut stmt = conn
            .prepare("SELECT id, name FROM users ORDER BY id")
            .expect("prepare");
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .expect("query")
            .collect::<rusqlite::Result<Vec<_>>>()
            .expect("collect")
    }
}
