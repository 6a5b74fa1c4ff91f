// src/tests/import_flow_tests.rs
//
// End-to-end: import batches through the store boundary, classify what
// came back, aggregate, export.

use crate::config::ThresholdConfig;
use crate::domain::diagnostic::{classify_all, Diagnostic};
use crate::domain::product::{ProductStatus, ProtectedField};
use crate::domain::stats::aggregate;
use crate::import::models::RawListing;
use crate::import::reconciler::{import_listings, EngagementDrop};
use crate::spreadsheets::export_inventory_xlsx;
use crate::store::records;
use crate::tests::utils::make_db;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn batch(json: &str) -> Vec<RawListing> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn import_persists_merges_and_reports() {
    let db = make_db("import_flow");
    let protected = ProtectedField::default_set();

    // Step 1: first import against an empty store creates everything.
    let old = (now() - Duration::days(70)).to_rfc3339();
    let report = import_listings(
        &db,
        &batch(&format!(
            r#"[
                {{"id": "A", "price": 20, "views": 5, "favorites": 0, "firstUploadDate": "{old}"}},
                {{"id": "B", "price": 8, "views": 100, "favorites": 12}}
            ]"#
        )),
        &protected,
        &EngagementDrop,
        now(),
    );

    assert!(report.success, "first import failed: {:?}", report.error);
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);

    // Step 2: the merged set is actually in the store.
    let stored = records::read_all(&db).unwrap();
    assert_eq!(stored.len(), 2);
    let a = stored.iter().find(|p| p.id == "A").unwrap();
    assert_eq!(a.days_old(now()), 70);

    // Step 3: second import drops A's price and sells B.
    let report = import_listings(
        &db,
        &batch(
            r#"[
                {"id": "A", "price": 15, "views": 9, "favorites": 1},
                {"id": "B", "price": 8, "status": "sold", "views": 120, "favorites": 12}
            ]"#,
        ),
        &protected,
        &EngagementDrop,
        now(),
    );

    assert!(report.success);
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);
    assert_eq!(report.price_changed, 1);

    let stored = records::read_all(&db).unwrap();
    let a = stored.iter().find(|p| p.id == "A").unwrap();
    let b = stored.iter().find(|p| p.id == "B").unwrap();

    assert_eq!(a.price, 15.0);
    assert_eq!(a.price_history.len(), 1);
    assert_eq!(b.status, ProductStatus::Sold);
    assert_eq!(b.sold_price, Some(8.0));

    // Step 4: classify the active side, aggregate both.
    let config = ThresholdConfig::default();
    let active = classify_all(&stored, now(), &config);
    assert_eq!(active.len(), 1);
    // A is 70 days old with 9 views: stale and unseen.
    assert_eq!(active[0].diagnostic, Some(Diagnostic::Invisible));

    let sold: Vec<_> = stored.iter().filter(|p| p.is_sold()).cloned().collect();
    let stats = aggregate(&sold, &active);
    assert_eq!(stats.total_sold, 1);
    assert_eq!(stats.total_active, 1);
    assert_eq!(stats.diagnostics.invisible, 1);

    // Step 5: the workbook export produces a real xlsx payload.
    let bytes = export_inventory_xlsx(&active, &stats).unwrap();
    // xlsx files are zip archives: "PK" magic.
    assert!(bytes.len() > 4);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn failed_normalization_never_blocks_the_rest_of_the_batch() {
    let db = make_db("dirty_batch");

    let report = import_listings(
        &db,
        &batch(r#"[{"id": "", "price": 3}, {"id": "OK", "price": 3}]"#),
        &ProtectedField::default_set(),
        &EngagementDrop,
        now(),
    );

    assert!(report.success);
    assert_eq!(report.count, 1);
    assert_eq!(records::read_all(&db).unwrap().len(), 1);
}
