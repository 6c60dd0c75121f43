//! Core infrastructure for crudql: the error type and the database layer
//! (connection lifecycle and record statements) that the CRUD run is built on.

pub mod db;
pub mod error;

pub use error::{CrudError, Result};
