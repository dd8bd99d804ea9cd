//! Record management for the four entity kinds an entry can reference.
//!
//! Deleting a teacher, subject, class or time slot removes every entry that
//! references it, in the same transaction. The schema has no
//! `ON DELETE CASCADE`; [`delete_with_entries`] is the only place the rule
//! lives.

pub mod classes;
pub mod subjects;
pub mod teachers;
pub mod timeslots;

use chrono::{NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::info;
use uuid::Uuid;

use crate::error::{TimetableError, TimetableResult};
use crate::model::Day;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}

/// `table` must be one of the fixed schema table names.
pub(crate) fn exists(conn: &Connection, table: &str, id: &str) -> TimetableResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?");
    let found: Option<i64> = conn.query_row(&sql, [id], |r| r.get(0)).optional()?;
    Ok(found.is_some())
}

pub(crate) fn day_col(row: &Row, idx: usize) -> rusqlite::Result<Day> {
    let raw: String = row.get(idx)?;
    Day::parse(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn time_col(row: &Row, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Delete one record and every entry referencing it through `fk_column`.
/// Returns the number of entries removed.
///
/// The write lock is taken up front so a busy workspace is waited on for
/// the busy timeout; a deferred read-then-write upgrade would fail at once.
pub(crate) fn delete_with_entries(
    conn: &Connection,
    entity: &'static str,
    table: &'static str,
    fk_column: &'static str,
    id: &str,
) -> TimetableResult<usize> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    if !exists(&tx, table, id)? {
        return Err(TimetableError::not_found(entity, id));
    }

    let removed = tx.execute(
        &format!("DELETE FROM entries WHERE {fk_column} = ?"),
        [id],
    )?;
    tx.execute(&format!("DELETE FROM {table} WHERE id = ?"), [id])?;
    tx.commit()?;

    info!(entity, id, removed_entries = removed, "record deleted");
    Ok(removed)
}
