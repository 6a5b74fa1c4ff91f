// src/import/reconciler.rs

use crate::domain::product::{
    FieldSet, PriceChange, PriceSource, Product, ProtectedField,
};
use crate::import::models::RawListing;
use crate::import::normalize::NormalizedListing;
use crate::store::connection::Database;
use crate::store::records;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// The sole contract the import exposes to its caller: what happened, in
/// counts, or why nothing happened at all. Callers never see a partially
/// applied merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    /// Entries that survived normalization (created + updated).
    pub count: usize,
    pub created: usize,
    pub updated: usize,
    pub reposted: usize,
    pub price_changed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportReport {
    fn failed(error: impl Into<String>) -> Self {
        ImportReport {
            success: false,
            error: Some(error.into()),
            ..ImportReport::default()
        }
    }
}

/// Decides whether an incoming snapshot is a re-publication of a listing
/// we already track.
///
/// There is no explicit "previously delisted" signal in the feed, so any
/// implementation is a heuristic; false positives and negatives are
/// expected and acceptable. Pluggable so the rule can be tuned without
/// touching the merge.
pub trait RepostSignal {
    fn is_repost(&self, existing: &Product, incoming: &NormalizedListing) -> bool;
}

/// Default heuristic: a repost restarts the marketplace's engagement
/// counters, so both dropping at once (while the price did not go up)
/// means the listing was re-published rather than merely stale.
#[derive(Debug, Default)]
pub struct EngagementDrop;

impl RepostSignal for EngagementDrop {
    fn is_repost(&self, existing: &Product, incoming: &NormalizedListing) -> bool {
        incoming.views < existing.views
            && incoming.favorites < existing.favorites
            && incoming.price <= existing.price
    }
}

/// A repost detector that never fires, for callers that want imports with
/// no repost side effects.
#[derive(Debug, Default)]
pub struct NoRepostDetection;

impl RepostSignal for NoRepostDetection {
    fn is_repost(&self, _existing: &Product, _incoming: &NormalizedListing) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct MergeOutcome {
    price_changed: bool,
    reposted: bool,
}

/// Merges a fresh import batch into the current record set.
///
/// Pure: no I/O, no hidden state. The caller persists the returned set (or
/// drops it) and owns the report. Malformed entries are skipped and
/// logged, never fatal; the feed is uncontrolled by design.
///
/// Output order is stable: existing records keep their order (updated in
/// place), newly created records append in batch order. Records absent
/// from the batch are retained unchanged; an import merges, it never
/// deletes. Within-batch duplicate ids collapse last-write-wins.
pub fn reconcile(
    current: &[Product],
    batch: &[RawListing],
    protected: &FieldSet,
    repost: &dyn RepostSignal,
    now: DateTime<Utc>,
) -> (Vec<Product>, ImportReport) {
    let mut merged: Vec<Product> = current.to_vec();
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let mut report = ImportReport {
        success: true,
        ..ImportReport::default()
    };

    for raw in batch {
        let incoming = match NormalizedListing::from_raw(raw, now) {
            Ok(listing) => listing,
            Err(reason) => {
                eprintln!("Skipping listing during import: {reason}");
                continue;
            }
        };

        report.count += 1;

        match index.get(&incoming.id).copied() {
            Some(i) => {
                let (product, outcome) = merge_existing(&merged[i], &incoming, protected, repost, now);
                merged[i] = product;
                report.updated += 1;
                if outcome.price_changed {
                    report.price_changed += 1;
                }
                if outcome.reposted {
                    report.reposted += 1;
                }
            }
            None => {
                let product = create_product(incoming, now);
                index.insert(product.id.clone(), merged.len());
                merged.push(product);
                report.created += 1;
            }
        }
    }

    (merged, report)
}

/// Inserts a brand new record from a normalized snapshot. The age anchor
/// is seeded from the import's upload date, falling back to now.
fn create_product(incoming: NormalizedListing, now: DateTime<Utc>) -> Product {
    Product {
        id: incoming.id,
        title: incoming.title,
        brand: incoming.brand,
        description: incoming.description,
        category: incoming.category,
        subcategory: incoming.subcategory,
        price: incoming.price,
        status: incoming.status,
        views: incoming.views,
        favorites: incoming.favorites,
        first_upload_date: Some(incoming.first_upload_date.unwrap_or(now)),
        created_at: incoming.created_at.unwrap_or(now),
        repost_count: 0,
        is_bundle: false,
        price_history: vec![],
        sold_price: incoming.sold_price,
        sold_date: incoming.sold_date,
    }
}

/// Merges an incoming snapshot into the record that shares its id.
///
/// Live marketplace state (price, status, engagement, text) is overwritten
/// by the snapshot; protected fields keep the stored value unless the
/// stored value is absent, in which case the snapshot seeds it.
fn merge_existing(
    existing: &Product,
    incoming: &NormalizedListing,
    protected: &FieldSet,
    repost: &dyn RepostSignal,
    now: DateTime<Utc>,
) -> (Product, MergeOutcome) {
    let mut outcome = MergeOutcome::default();
    let mut merged = existing.clone();

    // Evaluate the repost signal against the stored counters before the
    // snapshot overwrites them.
    outcome.reposted = repost.is_repost(existing, incoming);

    if incoming.price != existing.price {
        merged.price_history.push(PriceChange {
            old_price: existing.price,
            new_price: incoming.price,
            date: now,
            source: PriceSource::VintedImport,
        });
        outcome.price_changed = true;
    }

    // Live marketplace state. Text fields only overwrite when the snapshot
    // actually carried a value.
    merged.price = incoming.price;
    merged.status = incoming.status;
    merged.views = incoming.views;
    merged.favorites = incoming.favorites;
    if !incoming.title.is_empty() {
        merged.title = incoming.title.clone();
    }
    if incoming.brand.is_some() {
        merged.brand = incoming.brand.clone();
    }
    if incoming.description.is_some() {
        merged.description = incoming.description.clone();
    }

    // Protected fields. `is_bundle` is purely local (the feed has no
    // such concept) so it always survives as-is.
    merged.category = pick(
        protected.contains(&ProtectedField::Category),
        &existing.category,
        &incoming.category,
    );
    merged.subcategory = pick(
        protected.contains(&ProtectedField::Subcategory),
        &existing.subcategory,
        &incoming.subcategory,
    );
    merged.sold_price = pick(
        protected.contains(&ProtectedField::SoldPrice),
        &existing.sold_price,
        &incoming.sold_price,
    );
    merged.sold_date = pick(
        protected.contains(&ProtectedField::SoldDate),
        &existing.sold_date,
        &incoming.sold_date,
    );

    // The age anchor is monotonically preserved: whichever side wins, a
    // present value is never replaced by an absent one.
    merged.first_upload_date = if protected.contains(&ProtectedField::FirstUploadDate) {
        existing.first_upload_date.or(incoming.first_upload_date)
    } else {
        incoming.first_upload_date.or(existing.first_upload_date)
    };

    if outcome.reposted {
        // A repost restarts the listing's marketplace age.
        merged.repost_count += 1;
        merged.first_upload_date = Some(now);
    }

    (merged, outcome)
}

/// Protected: the stored value wins unless absent. Unprotected: the
/// snapshot wins where it carried a value.
fn pick<T: Clone>(is_protected: bool, existing: &Option<T>, incoming: &Option<T>) -> Option<T> {
    if is_protected {
        existing.clone().or_else(|| incoming.clone())
    } else {
        incoming.clone().or_else(|| existing.clone())
    }
}

/// Store-aware import boundary: read the full collection, reconcile,
/// persist the merged result in one transaction. On a persistence failure
/// the merge result is discarded: the store is left exactly as it was and
/// the report says so.
pub fn import_listings(
    db: &Database,
    batch: &[RawListing],
    protected: &FieldSet,
    repost: &dyn RepostSignal,
    now: DateTime<Utc>,
) -> ImportReport {
    let current = match records::read_all(db) {
        Ok(products) => products,
        Err(e) => return ImportReport::failed(e.to_string()),
    };

    let (merged, mut report) = reconcile(&current, batch, protected, repost, now);

    if let Err(e) = records::write_all(db, &merged) {
        report.success = false;
        report.error = Some(e.to_string());
    }
    report
}
