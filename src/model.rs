use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::{TimetableError, TimetableResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Error)]
#[error("unknown day: {0:?} (expected Monday..Sunday)")]
pub struct ParseDayError(String);

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Days shown on a class timetable.
    pub const SCHOOL_WEEK: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn parse(raw: &str) -> Result<Day, ParseDayError> {
        let trimmed = raw.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDayError(raw.to_string()))
    }
}

pub fn parse_hhmm(field: &str, raw: &str) -> TimetableResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| TimetableError::validation(format!("{field} must be HH:MM, got {raw:?}")))
}

pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Serde adapter for wall-clock times as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hhmm(*t))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub section: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<i64>,
    pub created_at: String,
}

impl Class {
    /// `"Grade 10 A"`, or just the name when there is no section.
    pub fn display_name(&self) -> String {
        display_class_name(&self.name, self.section.as_deref())
    }
}

pub fn display_class_name(name: &str, section: Option<&str>) -> String {
    match section {
        Some(s) if !s.is_empty() => format!("{name} {s}"),
        _ => name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub day: Day,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub period_name: Option<String>,
    pub is_break: bool,
    pub created_at: String,
}

/// Stored shape of a placement: ids only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub class_id: String,
    pub timeslot_id: String,
}

/// A placement with the display fields of everything it references,
/// resolved by joins when read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub class_id: String,
    pub class_name: String,
    pub room: Option<String>,
    pub timeslot_id: String,
    pub day: Day,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub period_name: Option<String>,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`) in patch payloads.
fn present<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTeacher {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub department: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub section: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub room: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub capacity: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTimeSlot {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub period_name: Option<String>,
    #[serde(default)]
    pub is_break: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotPatch {
    #[serde(default, deserialize_with = "present")]
    pub day: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub end_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub period_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub is_break: Option<Option<bool>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEntry {
    pub teacher_id: String,
    pub subject_id: String,
    pub class_id: String,
    pub timeslot_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, deserialize_with = "present")]
    pub teacher_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub subject_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub class_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub timeslot_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
}

// ---------------------------------------------------------------------------
// Field normalisation
// ---------------------------------------------------------------------------

/// Trim; blank becomes absent.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required(field: &str, value: &str) -> TimetableResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(TimetableError::validation(format!("{field} must not be empty")));
    }
    Ok(v.to_string())
}

/// Apply a patch key to a required field.
pub fn patch_required(
    field: &str,
    patch: Option<Option<String>>,
    current: String,
) -> TimetableResult<String> {
    match patch {
        None => Ok(current),
        Some(None) => Err(TimetableError::validation(format!("{field} cannot be null"))),
        Some(Some(v)) => required(field, &v),
    }
}

/// Apply a patch key to an optional text field.
pub fn patch_optional(patch: Option<Option<String>>, current: Option<String>) -> Option<String> {
    match patch {
        None => current,
        Some(v) => clean(v),
    }
}
