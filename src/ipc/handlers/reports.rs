use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, required_str};
use crate::ipc::types::{AppState, Request};
use crate::timetable::{project_class_timetable, report_model};

/// Model only; rendering (PDF/print) belongs to the front end.
fn handle_class_timetable_model(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let class_id = match required_str(req, "classId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match project_class_timetable(conn, &class_id) {
        Ok(timetable) => ok(&req.id, json!(report_model(&timetable))),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.classTimetableModel" => Some(handle_class_timetable_model(state, req)),
        _ => None,
    }
}
