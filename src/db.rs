use anyhow::Context;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "timetable.sqlite3";

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub fn open_db(workspace: &Path, busy_timeout_ms: u64) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.display()))?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure(&conn, busy_timeout_ms)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Both settings are per-connection in SQLite.
pub fn configure(conn: &Connection, busy_timeout_ms: u64) -> anyhow::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS teachers(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            phone TEXT,
            department TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS classes(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            section TEXT,
            room TEXT,
            capacity INTEGER,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Times are zero-padded HH:MM so text order is chronological. One slot
    // per (day, period): the class grid has a single cell for each.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS timeslots(
            id TEXT PRIMARY KEY,
            day TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            period_name TEXT,
            is_break INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            CHECK(start_time < end_time),
            UNIQUE(day, start_time, end_time)
        )",
        [],
    )?;

    // No ON DELETE CASCADE: the store deletes dependent entries explicitly.
    // The two UNIQUE keys back up the clash check against racing writers.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries(
            id TEXT PRIMARY KEY,
            teacher_id TEXT NOT NULL,
            subject_id TEXT NOT NULL,
            class_id TEXT NOT NULL,
            timeslot_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(teacher_id) REFERENCES teachers(id),
            FOREIGN KEY(subject_id) REFERENCES subjects(id),
            FOREIGN KEY(class_id) REFERENCES classes(id),
            FOREIGN KEY(timeslot_id) REFERENCES timeslots(id),
            UNIQUE(timeslot_id, teacher_id),
            UNIQUE(timeslot_id, class_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_teacher ON entries(teacher_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_subject ON entries(subject_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_class ON entries(class_id)",
        [],
    )?;

    Ok(())
}

/// Fresh in-memory database with the full schema.
#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    configure(&conn, DEFAULT_BUSY_TIMEOUT_MS).expect("configure db");
    init_schema(&conn).expect("init schema");
    conn
}
