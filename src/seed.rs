//! Demonstration school for an empty workspace.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use tracing::info;

use crate::error::{TimetableError, TimetableResult};
use crate::model::{Day, NewClass, NewSubject, NewTeacher, NewTimeSlot};
use crate::store::{classes, subjects, teachers, timeslots};

const TEACHERS: [(&str, &str, &str); 4] = [
    ("Dr. John Smith", "john@school.edu", "Mathematics"),
    ("Prof. Sarah Johnson", "sarah@school.edu", "Science"),
    ("Ms. Emily Davis", "emily@school.edu", "English"),
    ("Mr. Michael Brown", "michael@school.edu", "History"),
];

const SUBJECTS: [(&str, &str, &str); 5] = [
    ("Mathematics", "MATH101", "Basic Mathematics"),
    ("Physics", "PHY101", "Introduction to Physics"),
    ("Chemistry", "CHEM101", "General Chemistry"),
    ("English", "ENG101", "English Literature"),
    ("History", "HIST101", "World History"),
];

const CLASSES: [(&str, &str, &str, i64); 3] = [
    ("Grade 10", "A", "Room 101", 30),
    ("Grade 10", "B", "Room 102", 30),
    ("Grade 11", "A", "Room 201", 35),
];

/// (start, end, label, is_break)
const PERIODS: [(&str, &str, &str, bool); 7] = [
    ("09:00", "10:00", "Period 1", false),
    ("10:00", "11:00", "Period 2", false),
    ("11:00", "11:15", "Break", true),
    ("11:15", "12:15", "Period 3", false),
    ("12:15", "13:15", "Period 4", false),
    ("13:15", "14:00", "Lunch", true),
    ("14:00", "15:00", "Period 5", false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub teachers: usize,
    pub subjects: usize,
    pub classes: usize,
    pub timeslots: usize,
}

fn is_empty(conn: &Connection) -> TimetableResult<bool> {
    let total: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM teachers)
              + (SELECT COUNT(*) FROM subjects)
              + (SELECT COUNT(*) FROM classes)
              + (SELECT COUNT(*) FROM timeslots)",
        [],
        |r| r.get(0),
    )?;
    Ok(total == 0)
}

pub fn seed_sample(conn: &Connection) -> TimetableResult<SeedSummary> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    if !is_empty(&tx)? {
        return Err(TimetableError::validation(
            "workspace already has data; sample data is only loaded into an empty workspace",
        ));
    }

    for (name, email, department) in TEACHERS {
        teachers::create(
            &tx,
            NewTeacher {
                name: name.into(),
                email: Some(email.into()),
                phone: None,
                department: Some(department.into()),
            },
        )?;
    }
    for (name, code, description) in SUBJECTS {
        subjects::create(
            &tx,
            NewSubject {
                name: name.into(),
                code: code.into(),
                description: Some(description.into()),
            },
        )?;
    }
    for (name, section, room, capacity) in CLASSES {
        classes::create(
            &tx,
            NewClass {
                name: name.into(),
                section: Some(section.into()),
                room: Some(room.into()),
                capacity: Some(capacity),
            },
        )?;
    }
    let mut slot_count = 0;
    for day in Day::SCHOOL_WEEK {
        for (start, end, label, is_break) in PERIODS {
            timeslots::create(
                &tx,
                NewTimeSlot {
                    day: day.as_str().into(),
                    start_time: start.into(),
                    end_time: end.into(),
                    period_name: Some(label.into()),
                    is_break,
                },
            )?;
            slot_count += 1;
        }
    }
    tx.commit()?;

    let summary = SeedSummary {
        teachers: TEACHERS.len(),
        subjects: SUBJECTS.len(),
        classes: CLASSES.len(),
        timeslots: slot_count,
    };
    info!(?summary, "sample data loaded");
    Ok(summary)
}
