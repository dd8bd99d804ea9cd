//! Per-class day×period grid, and the render-ready table built from it.
//!
//! Time slots are stored per day, so rows are the distinct
//! `(start_time, end_time)` periods among non-break Monday–Friday slots.
//! A cell `(day, period)` holds the class's entry whose slot falls on that
//! day and period.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::entries;
use crate::error::TimetableResult;
use crate::model::{format_hhmm, hhmm, Day, Entry, EntryFilter};
use crate::store::{classes, timeslots};

pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableCell {
    pub entry_id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
}

impl From<&Entry> for TimetableCell {
    fn from(e: &Entry) -> Self {
        Self {
            entry_id: e.id.clone(),
            subject_code: e.subject_code.clone(),
            subject_name: e.subject_name.clone(),
            teacher_id: e.teacher_id.clone(),
            teacher_name: e.teacher_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub period_name: Option<String>,
    /// One per day in [`ClassTimetable::days`], same order.
    pub cells: Vec<Option<TimetableCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTimetable {
    pub class_id: String,
    pub class_name: String,
    pub days: Vec<Day>,
    pub rows: Vec<TimetableRow>,
}

impl ClassTimetable {
    pub fn cell(&self, day: Day, start: NaiveTime) -> Option<&TimetableCell> {
        let col = self.days.iter().position(|d| *d == day)?;
        self.rows
            .iter()
            .find(|r| r.start_time == start)
            .and_then(|r| r.cells[col].as_ref())
    }
}

pub fn project_class_timetable(
    conn: &Connection,
    class_id: &str,
) -> TimetableResult<ClassTimetable> {
    let class = classes::get(conn, class_id)?;
    let days = Day::SCHOOL_WEEK.to_vec();

    let teaching_slots: Vec<_> = timeslots::list(conn)?
        .into_iter()
        .filter(|s| !s.is_break && days.contains(&s.day))
        .collect();
    let teaching_ids: HashSet<&str> = teaching_slots.iter().map(|s| s.id.as_str()).collect();

    // Slots arrive in weekday order, so the first label seen per period is
    // the earliest day's.
    let mut periods: BTreeMap<(NaiveTime, NaiveTime), Option<String>> = BTreeMap::new();
    for slot in &teaching_slots {
        periods
            .entry((slot.start_time, slot.end_time))
            .or_insert_with(|| slot.period_name.clone());
    }

    let placed: Vec<Entry> = entries::list(
        conn,
        &EntryFilter {
            class_id: Some(class.id.clone()),
            ..Default::default()
        },
    )?
    .into_iter()
    .filter(|e| teaching_ids.contains(e.timeslot_id.as_str()))
    .collect();

    let rows = periods
        .into_iter()
        .map(|((start_time, end_time), period_name)| TimetableRow {
            start_time,
            end_time,
            period_name,
            cells: days
                .iter()
                .map(|day| {
                    placed
                        .iter()
                        .find(|e| {
                            e.day == *day && e.start_time == start_time && e.end_time == end_time
                        })
                        .map(TimetableCell::from)
                })
                .collect(),
        })
        .collect();

    Ok(ClassTimetable {
        class_name: class.display_name(),
        class_id: class.id,
        days,
        rows,
    })
}

/// Table handed to the report renderer: header row plus one text row per
/// period. Filled cells read `"<code>\n<teacher>"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableReport {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn report_model(timetable: &ClassTimetable) -> TimetableReport {
    let mut header = vec!["Time".to_string()];
    header.extend(timetable.days.iter().map(|d| d.as_str().to_string()));

    let rows = timetable
        .rows
        .iter()
        .map(|row| {
            let mut out = vec![format!(
                "{}-{}",
                format_hhmm(row.start_time),
                format_hhmm(row.end_time)
            )];
            out.extend(row.cells.iter().map(|cell| match cell {
                Some(c) => format!("{}\n{}", c.subject_code, c.teacher_name),
                None => EMPTY_CELL.to_string(),
            }));
            out
        })
        .collect();

    TimetableReport {
        title: format!("Timetable - {}", timetable.class_name),
        header,
        rows,
    }
}
