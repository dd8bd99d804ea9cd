mod common;

use common::Sidecar;
use serde_json::json;

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::spawn();

    let health = sc.ok("health", json!({}));
    assert!(health["workspacePath"].is_null());
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));

    // Everything but health/workspace.select needs an open workspace.
    let (code, _) = sc.err_code("teachers.list", json!({}));
    assert_eq!(code, "no_workspace");

    let selected = sc.ok(
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );
    assert_eq!(
        selected["workspacePath"],
        workspace.path().to_string_lossy().as_ref()
    );
    assert!(workspace.path().join("timetable.sqlite3").is_file());

    let seeded = sc.ok("setup.seedSample", json!({}));
    assert_eq!(
        seeded,
        json!({ "teachers": 4, "subjects": 5, "classes": 3, "timeslots": 35 })
    );

    let class_id = sc.ok("classes.list", json!({}))["classes"][0]["id"]
        .as_str()
        .expect("class id")
        .to_string();

    for method in [
        "teachers.list",
        "subjects.list",
        "classes.list",
        "timeslots.list",
        "entries.list",
    ] {
        sc.ok(method, json!({}));
    }
    for method in ["teachers.get", "subjects.get", "classes.get", "timeslots.get", "entries.get"] {
        let key = match method.split('.').next() {
            Some("teachers") => "teacherId",
            Some("subjects") => "subjectId",
            Some("classes") => "classId",
            Some("timeslots") => "timeslotId",
            _ => "entryId",
        };
        let (code, error) = sc.err_code(method, json!({ key: "missing" }));
        assert_eq!(code, "not_found", "{}", method);
        assert_eq!(error["details"]["id"], "missing");
    }

    sc.ok("timetable.class", json!({ "classId": class_id }));
    sc.ok("reports.classTimetableModel", json!({ "classId": class_id }));
    let check = sc.ok(
        "entries.checkConflict",
        json!({ "teacherId": "t", "classId": "c", "timeslotId": "s" }),
    );
    assert!(check["conflict"].is_null());

    let (code, error) = sc.err_code("grades.list", json!({}));
    assert_eq!(code, "not_implemented");
    assert!(error["message"]
        .as_str()
        .unwrap_or_default()
        .contains("grades.list"));

    sc.close();
}

#[test]
fn malformed_lines_get_bad_json_and_the_loop_keeps_serving() {
    let mut sc = Sidecar::spawn();

    let resp = sc.send_raw("{this is not json");
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "bad_json");

    let resp = sc.send_raw(r#"{"id":"x1","params":{}}"#);
    assert_eq!(resp["id"], "x1");
    assert_eq!(resp["error"]["code"], "bad_json");

    sc.ok("health", json!({}));
    sc.close();
}

#[test]
fn bad_params_for_missing_keys() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let mut sc = Sidecar::spawn();

    let (code, _) = sc.err_code("workspace.select", json!({}));
    assert_eq!(code, "bad_params");

    sc.ok(
        "workspace.select",
        json!({ "path": workspace.path().to_string_lossy() }),
    );
    let (code, _) = sc.err_code("teachers.update", json!({ "teacherId": "t" }));
    assert_eq!(code, "bad_params");
    let (code, _) = sc.err_code("timetable.class", json!({}));
    assert_eq!(code, "bad_params");
    let (code, _) = sc.err_code("entries.checkConflict", json!({ "teacherId": "t" }));
    assert_eq!(code, "bad_params");
    let (code, error) = sc.err_code(
        "entries.checkConflict",
        json!({ "teacherId": "t", "classId": "c", "timeslotId": "s", "excludeEntryId": 42 }),
    );
    assert_eq!(code, "bad_params");
    assert!(error["message"]
        .as_str()
        .unwrap_or_default()
        .contains("excludeEntryId"));
    let check = sc.ok(
        "entries.checkConflict",
        json!({ "teacherId": "t", "classId": "c", "timeslotId": "s", "excludeEntryId": null }),
    );
    assert!(check["conflict"].is_null());

    sc.close();
}
