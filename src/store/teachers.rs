use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{delete_with_entries, new_id, now};
use crate::error::{TimetableError, TimetableResult};
use crate::model::{
    clean, patch_optional, patch_required, required, NewTeacher, Teacher, TeacherPatch,
};

const SELECT: &str = "SELECT id, name, email, phone, department, created_at FROM teachers";

fn from_row(row: &Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        department: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn list(conn: &Connection) -> TimetableResult<Vec<Teacher>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY name, id"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get(conn: &Connection, id: &str) -> TimetableResult<Teacher> {
    conn.query_row(&format!("{SELECT} WHERE id = ?"), [id], from_row)
        .optional()?
        .ok_or_else(|| TimetableError::not_found("teacher", id))
}

pub fn create(conn: &Connection, input: NewTeacher) -> TimetableResult<Teacher> {
    let teacher = Teacher {
        id: new_id(),
        name: required("name", &input.name)?,
        email: clean(input.email),
        phone: clean(input.phone),
        department: clean(input.department),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO teachers(id, name, email, phone, department, created_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        params![
            teacher.id,
            teacher.name,
            teacher.email,
            teacher.phone,
            teacher.department,
            teacher.created_at
        ],
    )?;
    Ok(teacher)
}

pub fn update(conn: &Connection, id: &str, patch: TeacherPatch) -> TimetableResult<Teacher> {
    let current = get(conn, id)?;
    let next = Teacher {
        name: patch_required("name", patch.name, current.name)?,
        email: patch_optional(patch.email, current.email),
        phone: patch_optional(patch.phone, current.phone),
        department: patch_optional(patch.department, current.department),
        ..current
    };
    conn.execute(
        "UPDATE teachers SET name = ?, email = ?, phone = ?, department = ? WHERE id = ?",
        params![next.name, next.email, next.phone, next.department, next.id],
    )?;
    Ok(next)
}

/// Returns how many entries went with the teacher.
pub fn delete(conn: &Connection, id: &str) -> TimetableResult<usize> {
    delete_with_entries(conn, "teacher", "teachers", "teacher_id", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn new_teacher(name: &str, email: Option<&str>) -> NewTeacher {
        NewTeacher {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            department: Some("Mathematics".to_string()),
        }
    }

    #[test]
    fn create_trims_and_lists_by_name() {
        let conn = open_in_memory();
        create(&conn, new_teacher("  Ms. Davis ", Some(" emily@school.edu "))).expect("create");
        create(&conn, new_teacher("Dr. Smith", None)).expect("create");

        let all = list(&conn).expect("list");
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Smith", "Ms. Davis"]);
        assert_eq!(all[1].email.as_deref(), Some("emily@school.edu"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let conn = open_in_memory();
        let e = create(&conn, new_teacher("   ", None)).expect_err("blank");
        assert_eq!(e.code(), "validation_failed");
        assert!(list(&conn).expect("list").is_empty());
    }

    #[test]
    fn duplicate_email_is_rejected_but_missing_emails_may_repeat() {
        let conn = open_in_memory();
        create(&conn, new_teacher("A", Some("a@school.edu"))).expect("first");
        let e = create(&conn, new_teacher("B", Some("a@school.edu"))).expect_err("dup");
        assert_eq!(e.code(), "validation_failed");

        create(&conn, new_teacher("C", None)).expect("no email");
        create(&conn, new_teacher("D", Some("  "))).expect("blank email");
    }

    #[test]
    fn update_merges_patch() {
        let conn = open_in_memory();
        let t = create(&conn, new_teacher("Dr. Smith", Some("john@school.edu"))).expect("create");
        let patch: TeacherPatch =
            serde_json::from_value(serde_json::json!({ "phone": "555-0100", "email": null }))
                .expect("patch");
        let updated = update(&conn, &t.id, patch).expect("update");
        assert_eq!(updated.name, "Dr. Smith");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.email, None);
        assert_eq!(updated.department.as_deref(), Some("Mathematics"));
        assert_eq!(get(&conn, &t.id).expect("get"), updated);
    }

    #[test]
    fn update_missing_teacher_is_not_found() {
        let conn = open_in_memory();
        let e = update(&conn, "ghost", TeacherPatch::default()).expect_err("missing");
        assert_eq!(e.code(), "not_found");
    }
}
