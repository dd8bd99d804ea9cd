use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, param_as, params_as, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewClass, ClassPatch};
use crate::store::classes;

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    match classes::list(conn) {
        Ok(rows) => ok(&req.id, json!({ "classes": rows })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_classes_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "classId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match classes::get(conn, &id) {
        Ok(row) => ok(&req.id, json!({ "class": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_classes_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let input: NewClass = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match classes::create(conn, input) {
        Ok(row) => ok(&req.id, json!({ "class": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_classes_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "classId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: ClassPatch = match param_as(req, "patch") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match classes::update(conn, &id, patch) {
        Ok(row) => ok(&req.id, json!({ "class": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_classes_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "classId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match classes::delete(conn, &id) {
        Ok(removed) => ok(&req.id, json!({ "deletedEntries": removed })),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        "classes.get" => Some(handle_classes_get(state, req)),
        "classes.create" => Some(handle_classes_create(state, req)),
        "classes.update" => Some(handle_classes_update(state, req)),
        "classes.delete" => Some(handle_classes_delete(state, req)),
        _ => None,
    }
}
