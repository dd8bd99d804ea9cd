use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub busy_timeout_ms: u64,
}

impl AppState {
    pub fn new(busy_timeout_ms: u64) -> Self {
        Self {
            workspace: None,
            db: None,
            busy_timeout_ms,
        }
    }
}
