// src/store/connection.rs
use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::TrackerError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = RefCell::new(None);
}

/// Handle to the tracker's SQLite file. Cheap to clone (path only); the
/// actual connection is opened lazily, one per thread.
#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Open or fetch the per-thread connection and run `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, TrackerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, TrackerError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| TrackerError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| TrackerError::InternalError)?;
        inner_result
    }
}

/// Apply the bundled key-value schema. Safe to call on every startup.
pub fn init_db(db: &Database) -> Result<(), TrackerError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| TrackerError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
