// src/config.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS_CRITICAL: i64 = 90;
pub const DEFAULT_DAYS_INVISIBLE: i64 = 60;
pub const DEFAULT_DAYS_DESINTEREST: i64 = 45;
pub const DEFAULT_VIEWS_INVISIBLE: u32 = 20;
pub const DEFAULT_DAYS_OPPORTUNITY: i64 = 20;
pub const DEFAULT_FAVORITES_OPPORTUNITY: u32 = 8;

/// Tunables for the diagnostic classifier.
///
/// Loaded once per classification cycle and immutable for that cycle. The
/// user replaces it wholesale (full-record overwrite, never a partial
/// patch). Missing fields in a stored blob fall back to the documented
/// defaults via serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdConfig {
    /// Absolute staleness ceiling, in days listed.
    pub days_critical: i64,
    /// Age at which a low-view listing counts as undiscoverable.
    pub days_invisible: i64,
    /// Age at which a never-favorited listing counts as ignored.
    pub days_desinterest: i64,
    /// View count below which an old listing counts as unseen.
    pub views_invisible: u32,
    /// Minimum age before high interest becomes an actionable opportunity.
    pub days_opportunity: i64,
    /// Favorite count above which a listing counts as high interest.
    pub favorites_opportunity: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            days_critical: DEFAULT_DAYS_CRITICAL,
            days_invisible: DEFAULT_DAYS_INVISIBLE,
            days_desinterest: DEFAULT_DAYS_DESINTEREST,
            views_invisible: DEFAULT_VIEWS_INVISIBLE,
            days_opportunity: DEFAULT_DAYS_OPPORTUNITY,
            favorites_opportunity: DEFAULT_FAVORITES_OPPORTUNITY,
        }
    }
}

impl ThresholdConfig {
    /// Replace nonsensical values with the defaults. Applied once at load
    /// time so use sites never have to defend against a zero or negative
    /// day threshold.
    pub fn clamped(mut self) -> Self {
        let defaults = ThresholdConfig::default();
        if self.days_critical <= 0 {
            self.days_critical = defaults.days_critical;
        }
        if self.days_invisible <= 0 {
            self.days_invisible = defaults.days_invisible;
        }
        if self.days_desinterest <= 0 {
            self.days_desinterest = defaults.days_desinterest;
        }
        if self.days_opportunity <= 0 {
            self.days_opportunity = defaults.days_opportunity;
        }
        self
    }
}
