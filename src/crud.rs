//! The CRUD run: insert one record, print every record, rename one, delete one.
//!
//! Steps run strictly in order against one session. The first error aborts the
//! remaining steps and is returned to the caller; the session is marked failed
//! and its connection is released on the way out.

use crate::core::db::{ConnectionSettings, RecordStore, Session, SessionState, TableName};
use crate::core::{CrudError, Result};
use std::io::Write;
use tracing::{error, info};

pub const INSERTED_NOTICE: &str = "A new user was inserted successfully!";
pub const UPDATED_NOTICE: &str = "An existing user was updated successfully!";
pub const DELETED_NOTICE: &str = "A user was deleted successfully!";

/// The literal values a run binds into its statements.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudPlan {
    pub table: TableName,
    /// Name bound into the insert
    pub insert_name: String,
    /// Replacement name bound into the update
    pub update_name: String,
    /// Row targeted by both the update and the delete
    pub target_id: i64,
}

impl Default for CrudPlan {
    fn default() -> Self {
        CrudPlan {
            table: TableName::default(),
            insert_name: "John Doe".to_string(),
            update_name: "Jane Smith".to_string(),
            target_id: 1,
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrudReport {
    pub inserted: usize,
    pub rows_read: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Connects with `settings`, runs `plan`, and disconnects.
///
/// Status lines go to `out`. Nothing is written to the database if the
/// connection cannot be opened.
pub fn run_crud<W: Write>(
    settings: &ConnectionSettings,
    plan: &CrudPlan,
    out: &mut W,
) -> Result<CrudReport> {
    let mut session = Session::open(settings)?;

    match run_crud_on(&mut session, plan, out) {
        Ok(report) => {
            session.close()?;
            Ok(report)
        }
        Err(e) => {
            session.fail();
            error!("{} failed in state {:?}: {}", session.label(), session.state(), e);
            Err(e)
        }
    }
}

/// Runs the four steps of `plan` on an already connected session.
///
/// The session must be in `Connected`; it ends in `DeleteDone` on success.
pub fn run_crud_on<W: Write>(
    session: &mut Session,
    plan: &CrudPlan,
    out: &mut W,
) -> Result<CrudReport> {
    if !session.state().can_transition_to(SessionState::InsertDone) {
        return Err(CrudError::State {
            from: session.state(),
            to: SessionState::InsertDone,
        });
    }
    let mut report = CrudReport::default();

    // Create
    report.inserted = records(session, plan).insert(&plan.insert_name)?;
    if report.inserted > 0 {
        writeln!(out, "{}", INSERTED_NOTICE)?;
    }
    session.advance(SessionState::InsertDone)?;

    // Read
    report.rows_read = records(session, plan).for_each(|record| {
        writeln!(out, "{}", record)?;
        Ok(())
    })?;
    session.advance(SessionState::ReadDone)?;

    // Update
    report.updated = records(session, plan).update_name(plan.target_id, &plan.update_name)?;
    if report.updated > 0 {
        writeln!(out, "{}", UPDATED_NOTICE)?;
    }
    session.advance(SessionState::UpdateDone)?;

    // Delete
    report.deleted = records(session, plan).delete(plan.target_id)?;
    if report.deleted > 0 {
        writeln!(out, "{}", DELETED_NOTICE)?;
    }
    session.advance(SessionState::DeleteDone)?;

    out.flush()?;
    info!(
        "CRUD run on {} finished: inserted={} read={} updated={} deleted={}",
        session.label(),
        report.inserted,
        report.rows_read,
        report.updated,
        report.deleted
    );
    Ok(report)
}

fn records<'a>(session: &'a Session, plan: &'a CrudPlan) -> RecordStore<'a> {
    RecordStore::new(session.connection(), &plan.table)
}
