use serde_json::json;

use crate::conflict::{check_conflict, Placement};
use crate::entries;
use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, optional_str, param_as, params_as, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{EntryFilter, EntryPatch, NewEntry};

fn handle_entries_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let filter: EntryFilter = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entries::list(conn, &filter) {
        Ok(rows) => ok(&req.id, json!({ "entries": rows })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_entries_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let entry_id = match required_str(req, "entryId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entries::get(conn, &entry_id) {
        Ok(entry) => ok(&req.id, json!({ "entry": entry })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_entries_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let input: NewEntry = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entries::create(conn, input) {
        Ok(entry) => ok(&req.id, json!({ "entry": entry })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_entries_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let entry_id = match required_str(req, "entryId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: EntryPatch = match param_as(req, "patch") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entries::update(conn, &entry_id, patch) {
        Ok(entry) => ok(&req.id, json!({ "entry": entry })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_entries_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let entry_id = match required_str(req, "entryId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match entries::delete(conn, &entry_id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => domain_err(&req.id, &e),
    }
}

/// Dry run of the clash rules; nothing is written.
fn handle_entries_check_conflict(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let (teacher_id, class_id, timeslot_id) = match (
        required_str(req, "teacherId"),
        required_str(req, "classId"),
        required_str(req, "timeslotId"),
    ) {
        (Ok(t), Ok(c), Ok(s)) => (t, c, s),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return e,
    };
    let exclude = match optional_str(req, "excludeEntryId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let candidate = Placement {
        teacher_id: &teacher_id,
        class_id: &class_id,
        timeslot_id: &timeslot_id,
    };
    match check_conflict(conn, &candidate, exclude.as_deref()) {
        Ok(conflict) => ok(&req.id, json!({ "conflict": conflict })),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "entries.list" => Some(handle_entries_list(state, req)),
        "entries.get" => Some(handle_entries_get(state, req)),
        "entries.create" => Some(handle_entries_create(state, req)),
        "entries.update" => Some(handle_entries_update(state, req)),
        "entries.delete" => Some(handle_entries_delete(state, req)),
        "entries.checkConflict" => Some(handle_entries_check_conflict(state, req)),
        _ => None,
    }
}
