use rusqlite::Connection;
use serde::de::DeserializeOwned;

use super::error::err;
use super::types::{AppState, Request};

pub fn db_conn<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a Connection, serde_json::Value> {
    state
        .db
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Absent or `null` reads as `None`; any other non-string is rejected.
pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(v)) => Ok(Some(v.clone())),
        Some(_) => Err(err(
            &req.id,
            "bad_params",
            format!("{} must be a string", key),
            None,
        )),
    }
}

/// Whole `params` object as `T`; absent params read as `{}`.
pub fn params_as<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let raw = if req.params.is_null() {
        serde_json::json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(raw).map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

/// `params.<key>` as `T`; the key must be present.
pub fn param_as<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, serde_json::Value> {
    let Some(raw) = req.params.get(key) else {
        return Err(err(&req.id, "bad_params", format!("missing {}", key), None));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid {}: {}", key, e), None))
}
