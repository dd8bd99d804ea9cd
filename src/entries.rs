//! Entry placement: the only write path for timetable entries.
//!
//! Create and update run the clash check and the write inside one
//! `BEGIN IMMEDIATE` transaction, so a second writer on the same workspace
//! waits (bounded by the connection busy timeout) instead of interleaving
//! between check and commit. The `UNIQUE(timeslot_id, teacher_id)` and
//! `UNIQUE(timeslot_id, class_id)` keys catch anything that slips past.

use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use tracing::{info, warn};

use crate::conflict::{check_conflict, Conflict, Placement};
use crate::error::{is_unique_violation, TimetableError, TimetableResult};
use crate::model::{
    display_class_name, patch_required, required, Day, Entry, EntryFilter, EntryPatch, EntryRow,
    NewEntry,
};
use crate::store::{self, day_col, time_col};

const SELECT_VIEW: &str = "SELECT
       e.id, e.teacher_id, t.name, e.subject_id, s.name, s.code,
       e.class_id, c.name, c.section, c.room,
       e.timeslot_id, ts.day, ts.start_time, ts.end_time, ts.period_name,
       e.created_at
     FROM entries e
     JOIN teachers t ON t.id = e.teacher_id
     JOIN subjects s ON s.id = e.subject_id
     JOIN classes c ON c.id = e.class_id
     JOIN timeslots ts ON ts.id = e.timeslot_id";

fn view_from_row(row: &Row) -> rusqlite::Result<Entry> {
    let class_name: String = row.get(7)?;
    let section: Option<String> = row.get(8)?;
    Ok(Entry {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        teacher_name: row.get(2)?,
        subject_id: row.get(3)?,
        subject_name: row.get(4)?,
        subject_code: row.get(5)?,
        class_id: row.get(6)?,
        class_name: display_class_name(&class_name, section.as_deref()),
        room: row.get(9)?,
        timeslot_id: row.get(10)?,
        day: day_col(row, 11)?,
        start_time: time_col(row, 12)?,
        end_time: time_col(row, 13)?,
        period_name: row.get(14)?,
        created_at: row.get(15)?,
    })
}

impl EntryRow {
    pub fn placement(&self) -> Placement<'_> {
        Placement {
            teacher_id: &self.teacher_id,
            class_id: &self.class_id,
            timeslot_id: &self.timeslot_id,
        }
    }
}

pub fn get(conn: &Connection, id: &str) -> TimetableResult<Entry> {
    conn.query_row(&format!("{SELECT_VIEW} WHERE e.id = ?"), [id], view_from_row)
        .optional()?
        .ok_or_else(|| TimetableError::not_found("entry", id))
}

/// Filters combine with AND. Ordered by weekday, start time, class.
pub fn list(conn: &Connection, filter: &EntryFilter) -> TimetableResult<Vec<Entry>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    if let Some(class_id) = &filter.class_id {
        clauses.push("e.class_id = ?");
        args.push(Value::Text(class_id.clone()));
    }
    if let Some(teacher_id) = &filter.teacher_id {
        clauses.push("e.teacher_id = ?");
        args.push(Value::Text(teacher_id.clone()));
    }
    if let Some(raw) = &filter.day {
        let day = Day::parse(raw).map_err(|e| TimetableError::validation(e.to_string()))?;
        clauses.push("ts.day = ?");
        args.push(Value::Text(day.as_str().to_string()));
    }

    let mut sql = SELECT_VIEW.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY ts.start_time, c.name, c.section, e.id");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query_map(params_from_iter(args), view_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by_key(|e| e.day);
    Ok(rows)
}

fn load_row(conn: &Connection, id: &str) -> TimetableResult<EntryRow> {
    conn.query_row(
        "SELECT id, teacher_id, subject_id, class_id, timeslot_id FROM entries WHERE id = ?",
        [id],
        |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                teacher_id: row.get(1)?,
                subject_id: row.get(2)?,
                class_id: row.get(3)?,
                timeslot_id: row.get(4)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| TimetableError::not_found("entry", id))
}

fn reject_conflict(conflict: Option<Conflict>, row: &EntryRow) -> TimetableResult<()> {
    match conflict {
        None => Ok(()),
        Some(c) => {
            warn!(
                kind = c.kind.as_str(),
                conflicting_entry = %c.entry_id,
                teacher_id = %row.teacher_id,
                class_id = %row.class_id,
                timeslot_id = %row.timeslot_id,
                "placement rejected"
            );
            Err(TimetableError::Conflict(c))
        }
    }
}

fn ensure_references(conn: &Connection, row: &EntryRow) -> TimetableResult<()> {
    let refs = [
        ("teacherId", "teachers", &row.teacher_id),
        ("subjectId", "subjects", &row.subject_id),
        ("classId", "classes", &row.class_id),
        ("timeslotId", "timeslots", &row.timeslot_id),
    ];
    for (field, table, id) in refs {
        if !store::exists(conn, table, id)? {
            return Err(TimetableError::validation(format!("{field} {id} does not exist")));
        }
    }
    Ok(())
}

fn reject_break_slot(conn: &Connection, timeslot_id: &str) -> TimetableResult<()> {
    let is_break: i64 = conn.query_row(
        "SELECT is_break FROM timeslots WHERE id = ?",
        [timeslot_id],
        |r| r.get(0),
    )?;
    if is_break != 0 {
        return Err(TimetableError::validation(format!(
            "time slot {timeslot_id} is a break; entries cannot be placed in it"
        )));
    }
    Ok(())
}

/// A unique-key failure on `entries` means another writer won the slot;
/// report it as the clash it is.
fn commit_error(
    conn: &Connection,
    row: &EntryRow,
    exclude: Option<&str>,
    err: rusqlite::Error,
) -> TimetableError {
    if is_unique_violation(&err, "entries") {
        if let Ok(Some(c)) = check_conflict(conn, &row.placement(), exclude) {
            return TimetableError::Conflict(c);
        }
    }
    err.into()
}

fn insert_row(conn: &Connection, row: &EntryRow) -> TimetableResult<()> {
    conn.execute(
        "INSERT INTO entries(id, teacher_id, subject_id, class_id, timeslot_id, created_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        params![
            row.id,
            row.teacher_id,
            row.subject_id,
            row.class_id,
            row.timeslot_id,
            store::now()
        ],
    )
    .map_err(|e| commit_error(conn, row, None, e))?;
    Ok(())
}

pub fn create(conn: &Connection, input: NewEntry) -> TimetableResult<Entry> {
    let row = EntryRow {
        id: store::new_id(),
        teacher_id: required("teacherId", &input.teacher_id)?,
        subject_id: required("subjectId", &input.subject_id)?,
        class_id: required("classId", &input.class_id)?,
        timeslot_id: required("timeslotId", &input.timeslot_id)?,
    };

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    reject_conflict(check_conflict(&tx, &row.placement(), None)?, &row)?;
    ensure_references(&tx, &row)?;
    reject_break_slot(&tx, &row.timeslot_id)?;
    insert_row(&tx, &row)?;
    tx.commit()?;

    info!(
        entry_id = %row.id,
        teacher_id = %row.teacher_id,
        class_id = %row.class_id,
        timeslot_id = %row.timeslot_id,
        "entry created"
    );
    get(conn, &row.id)
}

/// Fields absent from `patch` keep their stored value; the clash check
/// always runs on the merged triple with the entry itself excluded.
pub fn update(conn: &Connection, id: &str, patch: EntryPatch) -> TimetableResult<Entry> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let current = load_row(&tx, id)?;

    let merged = EntryRow {
        id: current.id.clone(),
        teacher_id: patch_required("teacherId", patch.teacher_id, current.teacher_id.clone())?,
        subject_id: patch_required("subjectId", patch.subject_id, current.subject_id.clone())?,
        class_id: patch_required("classId", patch.class_id, current.class_id.clone())?,
        timeslot_id: patch_required("timeslotId", patch.timeslot_id, current.timeslot_id.clone())?,
    };

    reject_conflict(check_conflict(&tx, &merged.placement(), Some(id))?, &merged)?;
    ensure_references(&tx, &merged)?;
    if merged.timeslot_id != current.timeslot_id {
        reject_break_slot(&tx, &merged.timeslot_id)?;
    }

    tx.execute(
        "UPDATE entries
         SET teacher_id = ?, subject_id = ?, class_id = ?, timeslot_id = ?
         WHERE id = ?",
        params![
            merged.teacher_id,
            merged.subject_id,
            merged.class_id,
            merged.timeslot_id,
            merged.id
        ],
    )
    .map_err(|e| commit_error(&tx, &merged, Some(id), e))?;
    tx.commit()?;

    info!(entry_id = %id, "entry updated");
    get(conn, id)
}

pub fn delete(conn: &Connection, id: &str) -> TimetableResult<()> {
    let removed = conn.execute("DELETE FROM entries WHERE id = ?", [id])?;
    if removed == 0 {
        return Err(TimetableError::not_found("entry", id));
    }
    info!(entry_id = %id, "entry deleted");
    Ok(())
}
