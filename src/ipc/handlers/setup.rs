use serde_json::json;

use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::db_conn;
use crate::ipc::types::{AppState, Request};
use crate::seed::seed_sample;

fn handle_seed_sample(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(c) => c,
        Err(e) => return e,
    };
    match seed_sample(conn) {
        Ok(summary) => ok(&req.id, json!(summary)),
        Err(e) => domain_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "setup.seedSample" => Some(handle_seed_sample(state, req)),
        _ => None,
    }
}
