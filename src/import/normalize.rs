// src/import/normalize.rs

use crate::domain::product::ProductStatus;
use crate::import::models::RawListing;
use chrono::{DateTime, Utc};

/// A listing snapshot normalized onto the canonical schema, ready for the
/// merge. This acts as an anti-corruption layer between the raw import
/// document and our stored records: synonym fields are folded here, types
/// are coerced here, and nothing downstream branches on field presence.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedListing {
    pub id: String,
    pub title: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: f64,
    pub status: ProductStatus,
    pub views: u32,
    pub favorites: u32,
    pub first_upload_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub sold_price: Option<f64>,
    pub sold_date: Option<DateTime<Utc>>,
}

impl NormalizedListing {
    /// Normalizes one raw entry. It validates that the fields required for
    /// identification and merging exist; an `Err` means this entry is
    /// skipped, never that the batch aborts.
    pub fn from_raw(raw: &RawListing, now: DateTime<Utc>) -> Result<Self, String> {
        let id = raw
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("Missing or empty id")?
            .to_string();

        let price = raw.price.filter(|p| p.is_finite()).ok_or("Unparsable price")?;

        let status = match raw.status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("sold") => ProductStatus::Sold,
            _ => ProductStatus::Active,
        };

        // Helper to parse optional ISO date strings from the import.
        let parse_date = |date_str: Option<&str>| {
            date_str
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        };

        // Synonyms fold onto one canonical field, first present wins.
        let first_upload_date = parse_date(raw.first_upload_date.as_deref())
            .or_else(|| parse_date(raw.upload_date.as_deref()));
        let created_at = parse_date(raw.created_at.as_deref());
        let sold_date = parse_date(raw.sold_at.as_deref())
            .or_else(|| parse_date(raw.sold_date.as_deref()));

        // A sold snapshot must carry usable sale facts, defaulted when the
        // source omitted them.
        let (sold_price, sold_date) = if status == ProductStatus::Sold {
            (
                raw.sold_price.filter(|p| p.is_finite()).or(Some(price)),
                sold_date.or(Some(now)),
            )
        } else {
            (raw.sold_price.filter(|p| p.is_finite()), sold_date)
        };

        Ok(NormalizedListing {
            id,
            title: raw.title.clone().unwrap_or_default(),
            brand: non_empty(raw.brand.as_deref()),
            description: non_empty(raw.description.as_deref()),
            category: non_empty(raw.category.as_deref()),
            subcategory: non_empty(raw.subcategory.as_deref()),
            price,
            status,
            views: to_count(raw.views),
            favorites: to_count(raw.favorites),
            first_upload_date,
            created_at,
            sold_price,
            sold_date,
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Engagement counters default to 0 and can never go negative.
fn to_count(n: Option<f64>) -> u32 {
    match n {
        Some(v) if v.is_finite() && v > 0.0 => v as u32,
        _ => 0,
    }
}
