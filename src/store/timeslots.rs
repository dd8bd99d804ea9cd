use chrono::NaiveTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{day_col, delete_with_entries, new_id, now, time_col};
use crate::error::{TimetableError, TimetableResult};
use crate::model::{
    clean, format_hhmm, parse_hhmm, patch_optional, Day, NewTimeSlot, TimeSlot, TimeSlotPatch,
};

const SELECT: &str =
    "SELECT id, day, start_time, end_time, period_name, is_break, created_at FROM timeslots";

fn from_row(row: &Row) -> rusqlite::Result<TimeSlot> {
    Ok(TimeSlot {
        id: row.get(0)?,
        day: day_col(row, 1)?,
        start_time: time_col(row, 2)?,
        end_time: time_col(row, 3)?,
        period_name: row.get(4)?,
        is_break: row.get::<_, i64>(5)? != 0,
        created_at: row.get(6)?,
    })
}

fn parse_day(raw: &str) -> TimetableResult<Day> {
    Day::parse(raw).map_err(|e| TimetableError::validation(e.to_string()))
}

fn check_order(start: NaiveTime, end: NaiveTime) -> TimetableResult<()> {
    if start >= end {
        return Err(TimetableError::validation(format!(
            "startTime {} must be before endTime {}",
            format_hhmm(start),
            format_hhmm(end)
        )));
    }
    Ok(())
}

/// Weekday order, then start time.
pub fn list(conn: &Connection) -> TimetableResult<Vec<TimeSlot>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY start_time, end_time, id"))?;
    let mut rows = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.sort_by_key(|s| s.day);
    Ok(rows)
}

pub fn get(conn: &Connection, id: &str) -> TimetableResult<TimeSlot> {
    conn.query_row(&format!("{SELECT} WHERE id = ?"), [id], from_row)
        .optional()?
        .ok_or_else(|| TimetableError::not_found("timeslot", id))
}

pub fn create(conn: &Connection, input: NewTimeSlot) -> TimetableResult<TimeSlot> {
    let start_time = parse_hhmm("startTime", &input.start_time)?;
    let end_time = parse_hhmm("endTime", &input.end_time)?;
    check_order(start_time, end_time)?;

    let slot = TimeSlot {
        id: new_id(),
        day: parse_day(&input.day)?,
        start_time,
        end_time,
        period_name: clean(input.period_name),
        is_break: input.is_break,
        created_at: now(),
    };
    insert(conn, &slot)?;
    Ok(slot)
}

fn insert(conn: &Connection, slot: &TimeSlot) -> TimetableResult<()> {
    conn.execute(
        "INSERT INTO timeslots(id, day, start_time, end_time, period_name, is_break, created_at)
         VALUES(?, ?, ?, ?, ?, ?, ?)",
        params![
            slot.id,
            slot.day.as_str(),
            format_hhmm(slot.start_time),
            format_hhmm(slot.end_time),
            slot.period_name,
            slot.is_break as i64,
            slot.created_at
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: &str, patch: TimeSlotPatch) -> TimetableResult<TimeSlot> {
    let current = get(conn, id)?;

    let day = match patch.day {
        None => current.day,
        Some(None) => return Err(TimetableError::validation("day cannot be null")),
        Some(Some(raw)) => parse_day(&raw)?,
    };
    let start_time = match patch.start_time {
        None => current.start_time,
        Some(None) => return Err(TimetableError::validation("startTime cannot be null")),
        Some(Some(raw)) => parse_hhmm("startTime", &raw)?,
    };
    let end_time = match patch.end_time {
        None => current.end_time,
        Some(None) => return Err(TimetableError::validation("endTime cannot be null")),
        Some(Some(raw)) => parse_hhmm("endTime", &raw)?,
    };
    check_order(start_time, end_time)?;
    let is_break = match patch.is_break {
        None => current.is_break,
        Some(None) => return Err(TimetableError::validation("isBreak cannot be null")),
        Some(Some(v)) => v,
    };

    let next = TimeSlot {
        day,
        start_time,
        end_time,
        period_name: patch_optional(patch.period_name, current.period_name),
        is_break,
        ..current
    };
    conn.execute(
        "UPDATE timeslots
         SET day = ?, start_time = ?, end_time = ?, period_name = ?, is_break = ?
         WHERE id = ?",
        params![
            next.day.as_str(),
            format_hhmm(next.start_time),
            format_hhmm(next.end_time),
            next.period_name,
            next.is_break as i64,
            next.id
        ],
    )?;
    Ok(next)
}

pub fn delete(conn: &Connection, id: &str) -> TimetableResult<usize> {
    delete_with_entries(conn, "timeslot", "timeslots", "timeslot_id", id)
}
