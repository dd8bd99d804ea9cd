use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{db_conn, param_as, params_as, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewTimeSlot, TimeSlotPatch};
use crate::store::timeslots;

fn handle_timeslots_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    match timeslots::list(conn) {
        Ok(rows) => ok(&req.id, json!({ "timeslots": rows })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_timeslots_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "timeslotId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match timeslots::get(conn, &id) {
        Ok(row) => ok(&req.id, json!({ "timeslot": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_timeslots_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let input: NewTimeSlot = match params_as(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match timeslots::create(conn, input) {
        Ok(row) => ok(&req.id, json!({ "timeslot": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_timeslots_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "timeslotId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let patch: TimeSlotPatch = match param_as(req, "patch") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match timeslots::update(conn, &id, patch) {
        Ok(row) => ok(&req.id, json!({ "timeslot": row })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_timeslots_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let id = match required_str(req, "timeslotId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match timeslots::delete(conn, &id) {
        Ok(removed) => ok(&req.id, json!({ "deletedEntries": removed })),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "timeslots.list" => Some(handle_timeslots_list(state, req)),
        "timeslots.get" => Some(handle_timeslots_get(state, req)),
        "timeslots.create" => Some(handle_timeslots_create(state, req)),
        "timeslots.update" => Some(handle_timeslots_update(state, req)),
        "timeslots.delete" => Some(handle_timeslots_delete(state, req)),
        _ => None,
    }
}
