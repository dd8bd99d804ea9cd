use serde_json::json;
use thiserror::Error;

use crate::conflict::Conflict;

/// Failure taxonomy shared by the store, the entry manager and the projector.
///
/// Every variant is recoverable: the IPC layer reports it and keeps serving.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{}", .0.message)]
    Conflict(Conflict),

    #[error("database error: {0}")]
    Database(String),
}

impl TimetableError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable error code surfaced in IPC error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Database(_) => "db_query_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound { entity, id } => Some(json!({ "entity": entity, "id": id })),
            Self::Conflict(c) => Some(json!({
                "kind": c.kind.as_str(),
                "conflictingEntryId": c.entry_id,
                "timeslotId": c.timeslot_id,
            })),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for TimetableError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                Self::Validation(unique_violation_message(&msg))
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                Self::Validation("referenced record does not exist".into())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

fn unique_violation_message(msg: &str) -> String {
    if msg.contains("teachers.email") {
        "email is already used by another teacher".into()
    } else if msg.contains("subjects.code") {
        "subject code is already in use".into()
    } else if msg.contains("timeslots.day") {
        "a time slot already exists for that day and period".into()
    } else {
        format!("duplicate value: {msg}")
    }
}

pub type TimetableResult<T> = Result<T, TimetableError>;

/// True when `err` is a SQLite UNIQUE constraint failure on the given table.
pub fn is_unique_violation(err: &rusqlite::Error, table: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("UNIQUE")
                && msg.contains(&format!("{table}."))
        }
        _ => false,
    }
}
