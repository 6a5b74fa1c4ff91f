// src/domain/product.rs

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One listing tracked locally, mirroring a marketplace posting.
///
/// Serialized as camelCase JSON; this is both the persisted blob format and
/// the shape the mobile app exports, so stored and imported records share
/// one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Marketplace id, or "local:<rand>" for manually created entries.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub status: ProductStatus,

    // Last known engagement counters from the source.
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub favorites: u32,

    /// Original publication date; the anchor for all age computations.
    /// Never cleared once set. Only a repost resets it.
    #[serde(default)]
    pub first_upload_date: Option<DateTime<Utc>>,
    /// Local record creation time; age fallback when the anchor is absent.
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub repost_count: u32,
    /// Manually set: this listing groups multiple physical items.
    #[serde(default)]
    pub is_bundle: bool,

    /// Append-only price change log.
    #[serde(default)]
    pub price_history: Vec<PriceChange>,

    // Populated only when status == Sold.
    #[serde(default)]
    pub sold_price: Option<f64>,
    #[serde(default)]
    pub sold_date: Option<DateTime<Utc>>,
}

impl Product {
    /// The date age computations count from.
    pub fn age_anchor(&self) -> DateTime<Utc> {
        self.first_upload_date.unwrap_or(self.created_at)
    }

    /// Whole days since the age anchor, floored at 0 so a clock skewed
    /// into the future never yields a negative age.
    pub fn days_old(&self, now: DateTime<Utc>) -> i64 {
        (now - self.age_anchor()).num_days().max(0)
    }

    pub fn is_sold(&self) -> bool {
        self.status == ProductStatus::Sold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Sold,
}

/// One entry in a product's price change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub old_price: f64,
    pub new_price: f64,
    pub date: DateTime<Utc>,
    pub source: PriceSource,
}

/// Where a price change came from: a manual edit in the app, or the
/// marketplace import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "vinted_import")]
    VintedImport,
}

/// Fields whose locally edited value must survive a re-import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectedField {
    Category,
    Subcategory,
    FirstUploadDate,
    SoldPrice,
    SoldDate,
    IsBundle,
}

pub type FieldSet = HashSet<ProtectedField>;

impl ProtectedField {
    /// The standard protection set: everything the marketplace has no
    /// concept of, plus the age anchor.
    pub fn default_set() -> FieldSet {
        [
            ProtectedField::Category,
            ProtectedField::Subcategory,
            ProtectedField::FirstUploadDate,
            ProtectedField::SoldPrice,
            ProtectedField::SoldDate,
            ProtectedField::IsBundle,
        ]
        .into_iter()
        .collect()
    }
}

/// Generate an id for a manually created entry. The "local:" prefix keeps
/// it from ever colliding with a marketplace id.
/// Example: "local:x8Kq2pT41Wb0"
pub fn local_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("local:{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_old_uses_first_upload_date_when_present() {
        let product = Product {
            id: "A".into(),
            title: "Jeans".into(),
            brand: None,
            description: None,
            category: None,
            subcategory: None,
            price: 20.0,
            status: ProductStatus::Active,
            views: 0,
            favorites: 0,
            first_upload_date: Some(utc(2024, 1, 1)),
            created_at: utc(2024, 3, 1),
            repost_count: 0,
            is_bundle: false,
            price_history: vec![],
            sold_price: None,
            sold_date: None,
        };

        // Anchored on first_upload_date, not created_at.
        assert_eq!(product.days_old(utc(2024, 1, 11)), 10);

        // Future anchor floors at zero rather than going negative.
        assert_eq!(product.days_old(utc(2023, 12, 25)), 0);
    }

    #[test]
    fn days_old_falls_back_to_created_at() {
        let product = Product {
            id: "B".into(),
            title: String::new(),
            brand: None,
            description: None,
            category: None,
            subcategory: None,
            price: 5.0,
            status: ProductStatus::Active,
            views: 0,
            favorites: 0,
            first_upload_date: None,
            created_at: utc(2024, 3, 1),
            repost_count: 0,
            is_bundle: false,
            price_history: vec![],
            sold_price: None,
            sold_date: None,
        };

        assert_eq!(product.days_old(utc(2024, 3, 31)), 30);
    }

    #[test]
    fn product_round_trips_through_camel_case_json() {
        let json = r#"{
            "id": "123",
            "title": "Wool coat",
            "category": "Ropa",
            "price": 35.5,
            "status": "sold",
            "views": 40,
            "favorites": 3,
            "firstUploadDate": "2024-01-01T12:00:00Z",
            "createdAt": "2024-01-02T12:00:00Z",
            "repostCount": 1,
            "isBundle": false,
            "priceHistory": [
                {"oldPrice": 40.0, "newPrice": 35.5, "date": "2024-02-01T12:00:00Z", "source": "vinted_import"}
            ],
            "soldPrice": 35.5,
            "soldDate": "2024-03-01T12:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.status, ProductStatus::Sold);
        assert_eq!(product.price_history.len(), 1);
        assert_eq!(product.price_history[0].source, PriceSource::VintedImport);

        let back = serde_json::to_string(&product).unwrap();
        assert!(back.contains("\"firstUploadDate\""));
        assert!(back.contains("\"vinted_import\""));

        let again: Product = serde_json::from_str(&back).unwrap();
        assert_eq!(again, product);
    }

    #[test]
    fn local_ids_are_prefixed_and_unique() {
        let a = local_id();
        let b = local_id();
        assert!(a.starts_with("local:"));
        assert_eq!(a.len(), "local:".len() + 12);
        assert_ne!(a, b);
    }
}
