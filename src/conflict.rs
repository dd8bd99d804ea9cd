//! Clash detection for placements.
//!
//! Within one time slot a teacher teaches at most one class and a class
//! receives at most one subject. [`decide`] is the rule itself, a pure
//! function over the entries already placed; [`check_conflict`] loads those
//! entries for one slot and applies it. Neither mutates anything and
//! neither validates that the ids exist.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::TimetableResult;
use crate::model::EntryRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Teacher,
    Class,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::Teacher => "teacher",
            ConflictKind::Class => "class",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ConflictKind::Teacher => "Teacher is already assigned at this time slot",
            ConflictKind::Class => "This class already has a subject scheduled at this time slot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    /// The already-placed entry the candidate clashes with.
    #[serde(rename = "conflictingEntryId")]
    pub entry_id: String,
    pub timeslot_id: String,
    pub message: String,
}

impl Conflict {
    pub fn new(
        kind: ConflictKind,
        entry_id: impl Into<String>,
        timeslot_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entry_id: entry_id.into(),
            timeslot_id: timeslot_id.into(),
            message: kind.message().to_string(),
        }
    }
}

/// The triple the rule looks at. Subject never takes part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub teacher_id: &'a str,
    pub class_id: &'a str,
    pub timeslot_id: &'a str,
}

/// Teacher clashes are reported ahead of class clashes when both apply.
/// `exclude` names an entry to ignore, normally the one being edited.
pub fn decide(
    existing: &[EntryRow],
    candidate: &Placement<'_>,
    exclude: Option<&str>,
) -> Option<Conflict> {
    let slot = candidate.timeslot_id;

    if let Some(e) =
        same_slot(existing, slot, exclude).find(|e| e.teacher_id == candidate.teacher_id)
    {
        return Some(Conflict::new(ConflictKind::Teacher, &e.id, &e.timeslot_id));
    }
    if let Some(e) = same_slot(existing, slot, exclude).find(|e| e.class_id == candidate.class_id) {
        return Some(Conflict::new(ConflictKind::Class, &e.id, &e.timeslot_id));
    }
    None
}

fn same_slot<'e>(
    existing: &'e [EntryRow],
    timeslot_id: &'e str,
    exclude: Option<&'e str>,
) -> impl Iterator<Item = &'e EntryRow> + 'e {
    existing
        .iter()
        .filter(move |e| e.timeslot_id == timeslot_id && Some(e.id.as_str()) != exclude)
}

pub fn entries_in_slot(conn: &Connection, timeslot_id: &str) -> TimetableResult<Vec<EntryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, teacher_id, subject_id, class_id, timeslot_id
         FROM entries
         WHERE timeslot_id = ?
         ORDER BY created_at, id",
    )?;
    let rows = stmt
        .query_map([timeslot_id], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                teacher_id: row.get(1)?,
                subject_id: row.get(2)?,
                class_id: row.get(3)?,
                timeslot_id: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn check_conflict(
    conn: &Connection,
    candidate: &Placement<'_>,
    exclude: Option<&str>,
) -> TimetableResult<Option<Conflict>> {
    let existing = entries_in_slot(conn, candidate.timeslot_id)?;
    Ok(decide(&existing, candidate, exclude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, teacher: &str, class: &str, slot: &str) -> EntryRow {
        EntryRow {
            id: id.into(),
            teacher_id: teacher.into(),
            subject_id: "subj".into(),
            class_id: class.into(),
            timeslot_id: slot.into(),
        }
    }

    fn at<'a>(teacher: &'a str, class: &'a str, slot: &'a str) -> Placement<'a> {
        Placement {
            teacher_id: teacher,
            class_id: class,
            timeslot_id: slot,
        }
    }

    #[test]
    fn empty_slot_has_no_conflict() {
        assert_eq!(decide(&[], &at("T1", "C1", "S1"), None), None);
    }

    #[test]
    fn same_teacher_same_slot_is_teacher_conflict() {
        let existing = [row("e1", "T1", "C1", "S1")];
        let c = decide(&existing, &at("T1", "C2", "S1"), None).expect("conflict");
        assert_eq!(c.kind, ConflictKind::Teacher);
        assert_eq!(c.entry_id, "e1");
        assert_eq!(c.message, "Teacher is already assigned at this time slot");
    }

    #[test]
    fn same_class_same_slot_is_class_conflict() {
        let existing = [row("e1", "T1", "C1", "S1")];
        let c = decide(&existing, &at("T2", "C1", "S1"), None).expect("conflict");
        assert_eq!(c.kind, ConflictKind::Class);
        assert_eq!(c.entry_id, "e1");
    }

    #[test]
    fn different_teacher_and_class_share_a_slot() {
        let existing = [row("e1", "T1", "C1", "S1")];
        assert_eq!(decide(&existing, &at("T2", "C2", "S1"), None), None);
    }

    #[test]
    fn other_slots_are_ignored() {
        let existing = [row("e1", "T1", "C1", "S2")];
        assert_eq!(decide(&existing, &at("T1", "C1", "S1"), None), None);
    }

    #[test]
    fn teacher_conflict_wins_over_class_conflict() {
        // e1 would be a class clash, e2 a teacher clash; teacher is reported.
        let existing = [row("e1", "T9", "C1", "S1"), row("e2", "T1", "C9", "S1")];
        let c = decide(&existing, &at("T1", "C1", "S1"), None).expect("conflict");
        assert_eq!(c.kind, ConflictKind::Teacher);
        assert_eq!(c.entry_id, "e2");
    }

    #[test]
    fn excluded_entry_does_not_clash_with_itself() {
        let existing = [row("e1", "T1", "C1", "S1")];
        assert_eq!(decide(&existing, &at("T1", "C1", "S1"), Some("e1")), None);
        // Exclusion is by id only: a different entry still clashes.
        let existing = [row("e1", "T1", "C1", "S1"), row("e2", "T2", "C1", "S1")];
        let c = decide(&existing, &at("T1", "C1", "S1"), Some("e1")).expect("conflict");
        assert_eq!((c.kind, c.entry_id.as_str()), (ConflictKind::Class, "e2"));
    }

    #[test]
    fn decide_is_idempotent() {
        let existing = [row("e1", "T1", "C1", "S1"), row("e2", "T2", "C2", "S1")];
        let candidate = at("T2", "C3", "S1");
        let first = decide(&existing, &candidate, None);
        let second = decide(&existing, &candidate, None);
        assert_eq!(first, second);
        assert_eq!(first.map(|c| c.entry_id), Some("e2".to_string()));
    }

    #[test]
    fn check_conflict_reads_unknown_ids_as_clear() {
        let conn = crate::db::open_in_memory();
        let res = check_conflict(&conn, &at("nobody", "noclass", "noslot"), None).expect("check");
        assert_eq!(res, None);
    }

    #[test]
    fn conflict_serialises_for_the_wire() {
        let c = Conflict::new(ConflictKind::Class, "e1", "s1");
        let v = serde_json::to_value(&c).expect("json");
        assert_eq!(v["kind"], "class");
        assert_eq!(v["conflictingEntryId"], "e1");
        assert_eq!(v["timeslotId"], "s1");
    }
}
