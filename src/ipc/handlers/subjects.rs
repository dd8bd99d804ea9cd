use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, param_as, params_as, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewSubject, SubjectPatch};
use crate::store::subjects;

fn handle_subjects_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    match subjects::list(conn) {
        Ok(rows) => ok(&req.id, json!({ "subjects": rows })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_subjects_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "subjectId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match subjects::get(conn, &id) {
        Ok(row) => ok(&req.id, json!({ "subject": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_subjects_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let input: NewSubject = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match subjects::create(conn, input) {
        Ok(row) => ok(&req.id, json!({ "subject": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_subjects_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "subjectId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: SubjectPatch = match param_as(req, "patch") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match subjects::update(conn, &id, patch) {
        Ok(row) => ok(&req.id, json!({ "subject": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_subjects_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "subjectId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match subjects::delete(conn, &id) {
        Ok(removed) => ok(&req.id, json!({ "deletedEntries": removed })),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.list" => Some(handle_subjects_list(state, req)),
        "subjects.get" => Some(handle_subjects_get(state, req)),
        "subjects.create" => Some(handle_subjects_create(state, req)),
        "subjects.update" => Some(handle_subjects_update(state, req)),
        "subjects.delete" => Some(handle_subjects_delete(state, req)),
        _ => None,
    }
}
