use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, param_as, params_as, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewTeacher, TeacherPatch};
use crate::store::teachers;

fn handle_teachers_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    match teachers::list(conn) {
        Ok(rows) => ok(&req.id, json!({ "teachers": rows })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_teachers_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "teacherId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match teachers::get(conn, &id) {
        Ok(row) => ok(&req.id, json!({ "teacher": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_teachers_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let input: NewTeacher = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match teachers::create(conn, input) {
        Ok(row) => ok(&req.id, json!({ "teacher": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_teachers_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "teacherId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: TeacherPatch = match param_as(req, "patch") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match teachers::update(conn, &id, patch) {
        Ok(row) => ok(&req.id, json!({ "teacher": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_teachers_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "teacherId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match teachers::delete(conn, &id) {
        Ok(removed) => ok(&req.id, json!({ "deletedEntries": removed })),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(handle_teachers_list(state, req)),
        "teachers.get" => Some(handle_teachers_get(state, req)),
        "teachers.create" => Some(handle_teachers_create(state, req)),
        "teachers.update" => Some(handle_teachers_update(state, req)),
        "teachers.delete" => Some(handle_teachers_delete(state, req)),
        _ => None,
    }
}
