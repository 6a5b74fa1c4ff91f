// src/domain/stats.rs

use crate::domain::diagnostic::{ClassifiedProduct, Diagnostic};
use crate::domain::product::Product;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket key for records with no category set.
pub const UNCATEGORIZED: &str = "Otros";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub sold_count: usize,
    /// Sales with a known sold date, the denominator for the time average.
    pub timed_sale_count: usize,
    pub total_days_to_sale: i64,
    pub avg_days_to_sale: f64,
    pub total_profit: f64,
    pub avg_profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticCounts {
    pub critical: usize,
    pub invisible: usize,
    pub low_interest: usize,
    pub opportunity: usize,
    pub healthy: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_active: usize,
    pub total_sold: usize,
    pub avg_days_to_sale: f64,
    pub total_profit: f64,
    pub avg_profit: f64,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub diagnostics: DiagnosticCounts,
    pub hot_count: usize,
    pub cold_count: usize,
}

/// Average that yields 0 for an empty bucket instead of NaN.
fn safe_avg(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Days between upload and sale, floored at 1 so a same-day sale never
/// zeroes out an average.
fn days_to_sale(product: &Product) -> Option<i64> {
    let sold = product.sold_date?;
    Some((sold - product.age_anchor()).num_days().max(1))
}

/// Profit is margin over the listing price, not cost basis: what the sale
/// brought in relative to what was asked.
fn profit(product: &Product) -> Option<f64> {
    Some(product.sold_price? - product.price)
}

/// Rolls sold records and classified active records up into category-level
/// and portfolio-level statistics for the presentation layers.
pub fn aggregate(sold: &[Product], active: &[ClassifiedProduct]) -> PortfolioStats {
    let mut stats = PortfolioStats {
        total_active: active.len(),
        total_sold: sold.len(),
        ..PortfolioStats::default()
    };

    let mut portfolio_days: i64 = 0;
    let mut portfolio_timed: usize = 0;

    for product in sold {
        let key = product
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        let bucket = stats.by_category.entry(key).or_default();
        bucket.sold_count += 1;

        if let Some(days) = days_to_sale(product) {
            bucket.timed_sale_count += 1;
            bucket.total_days_to_sale += days;
            portfolio_timed += 1;
            portfolio_days += days;
        }
        if let Some(margin) = profit(product) {
            bucket.total_profit += margin;
            stats.total_profit += margin;
        }
    }

    for bucket in stats.by_category.values_mut() {
        bucket.avg_days_to_sale =
            safe_avg(bucket.total_days_to_sale as f64, bucket.timed_sale_count);
        bucket.avg_profit = safe_avg(bucket.total_profit, bucket.sold_count);
    }

    stats.avg_days_to_sale = safe_avg(portfolio_days as f64, portfolio_timed);
    stats.avg_profit = safe_avg(stats.total_profit, stats.total_sold);

    for entry in active {
        match entry.diagnostic {
            Some(Diagnostic::Critical) => stats.diagnostics.critical += 1,
            Some(Diagnostic::Invisible) => stats.diagnostics.invisible += 1,
            Some(Diagnostic::LowInterest) => stats.diagnostics.low_interest += 1,
            Some(Diagnostic::Opportunity) => stats.diagnostics.opportunity += 1,
            None => stats.diagnostics.healthy += 1,
        }
        if entry.is_hot {
            stats.hot_count += 1;
        }
        if entry.is_cold {
            stats.cold_count += 1;
        }
    }

    stats
}
