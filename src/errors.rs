// errors.rs
use std::fmt;

/// Errors originating from the tracker core: bad caller input or
/// downstream layers (DB, export).
#[derive(Debug)]
pub enum TrackerError {
    NotFound,
    BadInput(String),
    DbError(String),
    ExportError(String),
    InternalError,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::NotFound => write!(f, "Not Found"),
            TrackerError::BadInput(msg) => write!(f, "Bad Input: {msg}"),
            TrackerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            TrackerError::ExportError(msg) => write!(f, "Export Error: {msg}"),
            TrackerError::InternalError => write!(f, "Internal Error"),
        }
    }
}

impl std::error::Error for TrackerError {}
