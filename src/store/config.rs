// src/store/config.rs

use crate::config::ThresholdConfig;
use crate::errors::TrackerError;
use crate::store::connection::Database;
use rusqlite::{params, OptionalExtension};

const THRESHOLDS_KEY: &str = "thresholds";

/// Loads the threshold configuration, falling back to the documented
/// defaults when nothing is stored or the stored blob is corrupt. A bad
/// config must never make classification fail.
pub fn load_thresholds(db: &Database) -> ThresholdConfig {
    let body = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT body FROM settings WHERE key = ?1",
                params![THRESHOLDS_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| TrackerError::DbError(e.to_string()))
        })
        .ok()
        .flatten();

    match body {
        Some(body) => match serde_json::from_str::<ThresholdConfig>(&body) {
            Ok(config) => config.clamped(),
            Err(e) => {
                eprintln!("Ignoring corrupt threshold config: {e}");
                ThresholdConfig::default()
            }
        },
        None => ThresholdConfig::default(),
    }
}

/// Full-record overwrite of the threshold configuration. There is no
/// partial patch; callers write a complete config or nothing.
pub fn save_thresholds(db: &Database, config: &ThresholdConfig) -> Result<(), TrackerError> {
    let body =
        serde_json::to_string(config).map_err(|e| TrackerError::DbError(e.to_string()))?;

    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, body) VALUES (?1, ?2)",
            params![THRESHOLDS_KEY, body],
        )
        .map_err(|e| TrackerError::DbError(e.to_string()))?;
        Ok(())
    })
}
