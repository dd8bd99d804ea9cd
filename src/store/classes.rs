use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{delete_with_entries, new_id, now};
use crate::error::{TimetableError, TimetableResult};
use crate::model::{clean, patch_optional, patch_required, required, Class, ClassPatch, NewClass};

const SELECT: &str = "SELECT id, name, section, room, capacity, created_at FROM classes";

fn from_row(row: &Row) -> rusqlite::Result<Class> {
    Ok(Class {
        id: row.get(0)?,
        name: row.get(1)?,
        section: row.get(2)?,
        room: row.get(3)?,
        capacity: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn check_capacity(capacity: Option<i64>) -> TimetableResult<Option<i64>> {
    match capacity {
        Some(c) if c < 0 => Err(TimetableError::validation("capacity must not be negative")),
        other => Ok(other),
    }
}

pub fn list(conn: &Connection) -> TimetableResult<Vec<Class>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY name, section, id"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get(conn: &Connection, id: &str) -> TimetableResult<Class> {
    conn.query_row(&format!("{SELECT} WHERE id = ?"), [id], from_row)
        .optional()?
        .ok_or_else(|| TimetableError::not_found("class", id))
}

pub fn create(conn: &Connection, input: NewClass) -> TimetableResult<Class> {
    let class = Class {
        id: new_id(),
        name: required("name", &input.name)?,
        section: clean(input.section),
        room: clean(input.room),
        capacity: check_capacity(input.capacity)?,
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO classes(id, name, section, room, capacity, created_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        params![
            class.id,
            class.name,
            class.section,
            class.room,
            class.capacity,
            class.created_at
        ],
    )?;
    Ok(class)
}

pub fn update(conn: &Connection, id: &str, patch: ClassPatch) -> TimetableResult<Class> {
    let current = get(conn, id)?;
    let capacity = match patch.capacity {
        None => current.capacity,
        Some(v) => check_capacity(v)?,
    };
    let next = Class {
        name: patch_required("name", patch.name, current.name)?,
        section: patch_optional(patch.section, current.section),
        room: patch_optional(patch.room, current.room),
        capacity,
        ..current
    };
    conn.execute(
        "UPDATE classes SET name = ?, section = ?, room = ?, capacity = ? WHERE id = ?",
        params![next.name, next.section, next.room, next.capacity, next.id],
    )?;
    Ok(next)
}

pub fn delete(conn: &Connection, id: &str) -> TimetableResult<usize> {
    delete_with_entries(conn, "class", "classes", "class_id", id)
}
