use serde_json::json;

use crate::error::TimetableError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn domain_err(id: &str, e: &TimetableError) -> serde_json::Value {
    err(id, e.code(), e.to_string(), e.details())
}

/// Reply for a line that could not be parsed as a request. The id is echoed
/// when the line was valid JSON carrying one.
pub fn bad_json(line: &str, message: impl Into<String>) -> serde_json::Value {
    let id = serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string));
    let mut resp = json!({
        "ok": false,
        "error": { "code": "bad_json", "message": message.into() },
    });
    if let Some(id) = id {
        resp["id"] = json!(id);
    }
    resp
}
