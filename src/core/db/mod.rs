//! Database Module
//!
//! The database layer is split into two concerns:
//! - **Connection Management** (`connection.rs`): opening the SQLite file, the
//!   session state machine, and closing
//! - **Record Statements** (`records.rs`): the parameterized insert, select,
//!   update and delete statements against the records table
//!
//! All operations return the crate-wide `CrudError` so failures propagate with `?`.
pub mod connection;
pub mod records;

pub use connection::*;
pub use records::*;
