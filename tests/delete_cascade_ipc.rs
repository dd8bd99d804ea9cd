mod common;

use common::{placement, School, Sidecar};
use serde_json::json;

#[test]
fn deleting_a_teacher_removes_their_entries() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::open(workspace.path());
    let school = School::seed(&mut sc);

    let t1 = school.teacher("Dr. John Smith");
    let t2 = school.teacher("Prof. Sarah Johnson");
    let math = school.subject("MATH101");
    let chem = school.subject("CHEM101");
    let c1 = school.class("Grade 10", "A");
    let c2 = school.class("Grade 10", "B");

    sc.ok("entries.create", placement(&t1, &math, &c1, &school.slot("Monday", "09:00")));
    sc.ok("entries.create", placement(&t1, &math, &c2, &school.slot("Thursday", "14:00")));
    sc.ok("entries.create", placement(&t2, &chem, &c1, &school.slot("Monday", "10:00")));

    let deleted = sc.ok("teachers.delete", json!({ "teacherId": t1 }));
    assert_eq!(deleted["deletedEntries"], 2);

    let mine = sc.ok("entries.list", json!({ "teacherId": t1 }));
    assert_eq!(mine["entries"], json!([]));
    let rest = sc.ok("entries.list", json!({}));
    assert_eq!(rest["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(rest["entries"][0]["teacherId"], t2.as_str());

    let (code, _) = sc.err_code("teachers.get", json!({ "teacherId": t1 }));
    assert_eq!(code, "not_found");

    sc.close();
}

#[test]
fn deleting_a_class_or_slot_cascades_too() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::open(workspace.path());
    let school = School::seed(&mut sc);

    let t1 = school.teacher("Mr. Michael Brown");
    let hist = school.subject("HIST101");
    let c1 = school.class("Grade 11", "A");
    let c2 = school.class("Grade 10", "B");
    let fri9 = school.slot("Friday", "09:00");

    sc.ok("entries.create", placement(&t1, &hist, &c1, &fri9));
    sc.ok("entries.create", placement(&t1, &hist, &c2, &school.slot("Friday", "10:00")));

    let deleted = sc.ok("timeslots.delete", json!({ "timeslotId": fri9 }));
    assert_eq!(deleted["deletedEntries"], 1);
    let deleted = sc.ok("classes.delete", json!({ "classId": c2 }));
    assert_eq!(deleted["deletedEntries"], 1);
    assert_eq!(sc.ok("entries.list", json!({}))["entries"], json!([]));

    let deleted = sc.ok("subjects.delete", json!({ "subjectId": hist }));
    assert_eq!(deleted["deletedEntries"], 0);

    sc.close();
}
