use crate::store::connection::{init_db, Database};
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database with the production schema applied.
/// A unique temp path per call keeps tests independent.
pub fn make_db(label: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "tracker_test_{}_{}.sqlite",
        label,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy());
    init_db(&db).expect("Failed to initialize test DB");
    db
}
