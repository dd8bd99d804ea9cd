mod common;

use common::{placement, School, Sidecar};
use serde_json::json;

#[test]
fn class_timetable_and_report_model() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::open(workspace.path());
    let school = School::seed(&mut sc);

    let t1 = school.teacher("Dr. John Smith");
    let t3 = school.teacher("Ms. Emily Davis");
    let math = school.subject("MATH101");
    let eng = school.subject("ENG101");
    let c1 = school.class("Grade 10", "A");
    let c2 = school.class("Grade 10", "B");

    sc.ok("entries.create", placement(&t1, &math, &c1, &school.slot("Monday", "09:00")));
    sc.ok("entries.create", placement(&t3, &eng, &c1, &school.slot("Friday", "14:00")));
    // Another class's entry must not leak into Grade 10 A's grid.
    sc.ok("entries.create", placement(&t3, &eng, &c2, &school.slot("Tuesday", "09:00")));

    let tt = sc.ok("timetable.class", json!({ "classId": c1 }))["timetable"].clone();
    assert_eq!(tt["className"], "Grade 10 A");
    assert_eq!(
        tt["days"],
        json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"])
    );
    let rows = tt["rows"].as_array().cloned().expect("rows");
    let periods: Vec<&str> = rows.iter().filter_map(|r| r["periodName"].as_str()).collect();
    assert_eq!(periods, vec!["Period 1", "Period 2", "Period 3", "Period 4", "Period 5"]);
    assert_eq!(rows[0]["cells"][0]["subjectCode"], "MATH101");
    assert!(rows[0]["cells"][1].is_null());
    assert_eq!(rows[4]["cells"][4]["teacherName"], "Ms. Emily Davis");

    let report = sc.ok("reports.classTimetableModel", json!({ "classId": c1 }));
    assert_eq!(report["title"], "Timetable - Grade 10 A");
    assert_eq!(
        report["header"],
        json!(["Time", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday"])
    );
    assert_eq!(
        report["rows"][0],
        json!(["09:00-10:00", "MATH101\nDr. John Smith", "-", "-", "-", "-"])
    );
    assert_eq!(report["rows"][1], json!(["10:00-11:00", "-", "-", "-", "-", "-"]));
    assert_eq!(
        report["rows"][4],
        json!(["14:00-15:00", "-", "-", "-", "-", "ENG101\nMs. Emily Davis"])
    );

    let (code, _) = sc.err_code("timetable.class", json!({ "classId": "nope" }));
    assert_eq!(code, "not_found");

    sc.close();
}

#[test]
fn seeding_twice_is_refused() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::open(workspace.path());
    School::seed(&mut sc);
    let (code, _) = sc.err_code("setup.seedSample", json!({}));
    assert_eq!(code, "validation_failed");
    assert_eq!(
        sc.ok("teachers.list", json!({}))["teachers"].as_array().map(Vec::len),
        Some(4)
    );
    sc.close();
}
