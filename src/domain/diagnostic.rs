// src/domain/diagnostic.rs

use crate::config::ThresholdConfig;
use crate::domain::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single classification label describing why a listing needs
/// attention. `None` from [`classify`] means the listing is healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "INVISIBLE")]
    Invisible,
    #[serde(rename = "DESINTERES")]
    LowInterest,
    #[serde(rename = "OPPORTUNITY")]
    Opportunity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Diagnostic::Critical => "CRITICAL",
            Diagnostic::Invisible => "INVISIBLE",
            Diagnostic::LowInterest => "DESINTERES",
            Diagnostic::Opportunity => "OPPORTUNITY",
        };
        write!(f, "{label}")
    }
}

/// Determines the diagnostic label for an active listing.
///
/// The order of checks determines the precedence of the labels. Several
/// conditions can hold at once (a 95-day-old listing with 2 views is both
/// critical and invisible); the first match wins, so staleness always
/// outranks discoverability, which outranks interest.
///
/// Total over any record + config: absent engagement data is already 0 on
/// the record, and age floors at 0.
pub fn classify(
    product: &Product,
    now: DateTime<Utc>,
    config: &ThresholdConfig,
) -> Option<Diagnostic> {
    let days_old = product.days_old(now);

    if days_old >= config.days_critical {
        return Some(Diagnostic::Critical);
    }
    if days_old >= config.days_invisible && product.views < config.views_invisible {
        return Some(Diagnostic::Invisible);
    }
    // Seen well past the invisibility bar but never favorited: the listing
    // is discoverable, buyers just don't want it at this price/description.
    if days_old >= config.days_desinterest
        && product.favorites == 0
        && product.views > config.views_invisible + 10
    {
        return Some(Diagnostic::LowInterest);
    }
    if product.favorites > config.favorites_opportunity && days_old > config.days_opportunity {
        return Some(Diagnostic::Opportunity);
    }

    None
}

/// Secondary badges, independent of the diagnostic label.
/// Hot: plenty of recent engagement. Cold: aging but not yet critical.
pub fn is_hot(product: &Product, now: DateTime<Utc>) -> bool {
    (product.views > 50 || product.favorites > 10) && product.days_old(now) < 30
}

pub fn is_cold(product: &Product, now: DateTime<Utc>, config: &ThresholdConfig) -> bool {
    let days_old = product.days_old(now);
    days_old >= config.days_desinterest && days_old < config.days_critical
}

/// An active listing with its computed diagnostic and badges, ready for
/// aggregation or export.
#[derive(Debug, Clone)]
pub struct ClassifiedProduct {
    pub product: Product,
    pub diagnostic: Option<Diagnostic>,
    pub days_old: i64,
    pub is_hot: bool,
    pub is_cold: bool,
}

/// Classifies every active (unsold) record. Sold records carry no
/// diagnostic and are skipped.
pub fn classify_all(
    products: &[Product],
    now: DateTime<Utc>,
    config: &ThresholdConfig,
) -> Vec<ClassifiedProduct> {
    products
        .iter()
        .filter(|p| !p.is_sold())
        .map(|p| ClassifiedProduct {
            diagnostic: classify(p, now, config),
            days_old: p.days_old(now),
            is_hot: is_hot(p, now),
            is_cold: is_cold(p, now, config),
            product: p.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductStatus;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// An active product first uploaded `days_old` days before `now()`.
    fn aged_product(days_old: i64, views: u32, favorites: u32) -> Product {
        let uploaded = now() - Duration::days(days_old);
        Product {
            id: "A".into(),
            title: "Test".into(),
            brand: None,
            description: None,
            category: None,
            subcategory: None,
            price: 20.0,
            status: ProductStatus::Active,
            views,
            favorites,
            first_upload_date: Some(uploaded),
            created_at: uploaded,
            repost_count: 0,
            is_bundle: false,
            price_history: vec![],
            sold_price: None,
            sold_date: None,
        }
    }

    #[test]
    fn critical_takes_precedence_over_invisible() {
        let config = ThresholdConfig::default();

        // 95 days old with 2 views matches both CRITICAL (>= 90) and
        // INVISIBLE (>= 60 days, < 20 views). CRITICAL must win.
        let product = aged_product(95, 2, 0);
        assert_eq!(
            classify(&product, now(), &config),
            Some(Diagnostic::Critical)
        );
    }

    #[test]
    fn invisible_requires_age_and_low_views() {
        let config = ThresholdConfig::default();

        // Old and unseen -> INVISIBLE.
        assert_eq!(
            classify(&aged_product(65, 5, 0), now(), &config),
            Some(Diagnostic::Invisible)
        );

        // Same age but plenty of views -> not invisible. With zero
        // favorites and views above the bar it is low interest instead.
        assert_eq!(
            classify(&aged_product(65, 40, 0), now(), &config),
            Some(Diagnostic::LowInterest)
        );

        // Low views but still young -> healthy.
        assert_eq!(classify(&aged_product(30, 5, 0), now(), &config), None);
    }

    #[test]
    fn low_interest_requires_views_above_invisibility_bar() {
        let config = ThresholdConfig::default();

        // 25 views is not above viewsInvisible + 10 (= 30): no diagnostic,
        // but also not invisible (views >= 20).
        assert_eq!(classify(&aged_product(50, 25, 0), now(), &config), None);

        // 31 views crosses the bar.
        assert_eq!(
            classify(&aged_product(50, 31, 0), now(), &config),
            Some(Diagnostic::LowInterest)
        );

        // A single favorite clears the label.
        assert_eq!(classify(&aged_product(50, 31, 1), now(), &config), None);
    }

    #[test]
    fn opportunity_needs_high_favorites_and_some_age() {
        let config = ThresholdConfig::default();

        assert_eq!(
            classify(&aged_product(25, 40, 9), now(), &config),
            Some(Diagnostic::Opportunity)
        );

        // Exactly at the favorite threshold: not an opportunity.
        assert_eq!(classify(&aged_product(25, 40, 8), now(), &config), None);

        // Too young to push toward an offer yet.
        assert_eq!(classify(&aged_product(10, 40, 9), now(), &config), None);
    }

    #[test]
    fn classify_is_total_over_degenerate_records() {
        // Even a freshly created record with no anchor and no engagement
        // classifies without panicking.
        let mut product = aged_product(0, 0, 0);
        product.first_upload_date = None;
        assert_eq!(
            classify(&product, now(), &ThresholdConfig::default()),
            None
        );
    }

    #[test]
    fn hot_and_cold_badges() {
        let config = ThresholdConfig::default();

        // Young with strong views -> hot, not cold.
        let fresh = aged_product(10, 60, 0);
        assert!(is_hot(&fresh, now()));
        assert!(!is_cold(&fresh, now(), &config));

        // Favorites alone can make a listing hot.
        assert!(is_hot(&aged_product(10, 0, 11), now()));

        // Aging but below the critical ceiling -> cold. A cold listing can
        // never be hot (hot requires < 30 days).
        let stale = aged_product(50, 60, 11);
        assert!(is_cold(&stale, now(), &config));
        assert!(!is_hot(&stale, now()));

        // Past the ceiling it is critical, no longer merely cold.
        assert!(!is_cold(&aged_product(95, 0, 0), now(), &config));
    }

    #[test]
    fn classify_all_skips_sold_records() {
        let config = ThresholdConfig::default();
        let mut sold = aged_product(100, 0, 0);
        sold.status = ProductStatus::Sold;
        let active = aged_product(95, 0, 0);

        let classified = classify_all(&[sold, active], now(), &config);
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].diagnostic, Some(Diagnostic::Critical));
        assert_eq!(classified[0].days_old, 95);
    }
}
