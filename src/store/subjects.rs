use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{delete_with_entries, new_id, now};
use crate::error::{TimetableError, TimetableResult};
use crate::model::{
    clean, patch_optional, patch_required, required, NewSubject, Subject, SubjectPatch,
};

const SELECT: &str = "SELECT id, name, code, description, created_at FROM subjects";

fn from_row(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn list(conn: &Connection) -> TimetableResult<Vec<Subject>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY code"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get(conn: &Connection, id: &str) -> TimetableResult<Subject> {
    conn.query_row(&format!("{SELECT} WHERE id = ?"), [id], from_row)
        .optional()?
        .ok_or_else(|| TimetableError::not_found("subject", id))
}

pub fn create(conn: &Connection, input: NewSubject) -> TimetableResult<Subject> {
    let subject = Subject {
        id: new_id(),
        name: required("name", &input.name)?,
        code: required("code", &input.code)?,
        description: clean(input.description),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO subjects(id, name, code, description, created_at) VALUES(?, ?, ?, ?, ?)",
        params![
            subject.id,
            subject.name,
            subject.code,
            subject.description,
            subject.created_at
        ],
    )?;
    Ok(subject)
}

pub fn update(conn: &Connection, id: &str, patch: SubjectPatch) -> TimetableResult<Subject> {
    let current = get(conn, id)?;
    let next = Subject {
        name: patch_required("name", patch.name, current.name)?,
        code: patch_required("code", patch.code, current.code)?,
        description: patch_optional(patch.description, current.description),
        ..current
    };
    conn.execute(
        "UPDATE subjects SET name = ?, code = ?, description = ? WHERE id = ?",
        params![next.name, next.code, next.description, next.id],
    )?;
    Ok(next)
}

pub fn delete(conn: &Connection, id: &str) -> TimetableResult<usize> {
    delete_with_entries(conn, "subject", "subjects", "subject_id", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn new_subject(name: &str, code: &str) -> NewSubject {
        NewSubject {
            name: name.to_string(),
            code: code.to_string(),
            description: None,
        }
    }

    #[test]
    fn code_is_required_and_unique() {
        let conn = open_in_memory();
        let e = create(&conn, new_subject("Physics", " ")).expect_err("blank code");
        assert_eq!(e.code(), "validation_failed");

        create(&conn, new_subject("Physics", "PHY101")).expect("create");
        let e = create(&conn, new_subject("Physics II", "PHY101")).expect_err("dup");
        assert_eq!(e.to_string(), "subject code is already in use");
    }

    #[test]
    fn list_is_ordered_by_code() {
        let conn = open_in_memory();
        create(&conn, new_subject("Physics", "PHY101")).expect("create");
        create(&conn, new_subject("Chemistry", "CHEM101")).expect("create");
        let codes: Vec<_> = list(&conn)
            .expect("list")
            .into_iter()
            .map(|s| s.code)
            .collect();
        assert_eq!(codes, vec!["CHEM101", "PHY101"]);
    }

    #[test]
    fn update_cannot_steal_another_code() {
        let conn = open_in_memory();
        create(&conn, new_subject("Physics", "PHY101")).expect("create");
        let chem = create(&conn, new_subject("Chemistry", "CHEM101")).expect("create");
        let patch = SubjectPatch {
            code: Some(Some("PHY101".to_string())),
            ..Default::default()
        };
        let e = update(&conn, &chem.id, patch).expect_err("dup code");
        assert_eq!(e.code(), "validation_failed");
        assert_eq!(get(&conn, &chem.id).expect("get").code, "CHEM101");
    }
}
