// src/import/models.rs

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// raw listing (as exported by the marketplace scrape)
//  ├── id                      required downstream, may arrive as number
//  ├── title / brand / description
//  ├── category / subcategory
//  ├── price                   number or string ("12,50", "12.50 €")
//  ├── status                  "active" | "sold" (free text, any case)
//  ├── views / favorites       number or string
//  ├── firstUploadDate | uploadDate | createdAt
//  └── soldPrice, soldAt | soldDate
//
// The feed is uncontrolled: every field is optional here and the
// normalization step decides what is fatal for a single entry.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListing {
    #[serde(deserialize_with = "de_lenient_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(deserialize_with = "de_lenient_number")]
    pub price: Option<f64>,
    pub status: Option<String>,
    #[serde(deserialize_with = "de_lenient_number")]
    pub views: Option<f64>,
    #[serde(deserialize_with = "de_lenient_number")]
    pub favorites: Option<f64>,

    // Date-field synonyms, folded onto one canonical schema by the
    // normalization step.
    pub first_upload_date: Option<String>,
    pub upload_date: Option<String>,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "de_lenient_number")]
    pub sold_price: Option<f64>,
    pub sold_at: Option<String>,
    pub sold_date: Option<String>,
}

/// Accepts a JSON number or a numeric string. Strings get currency symbols
/// stripped and a decimal comma folded to a point before parsing; anything
/// unparsable becomes `None` rather than failing the whole entry.
fn de_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_loose_number(&s),
        _ => None,
    }))
}

/// Accepts a JSON string or number for the id (some exports write numeric
/// ids unquoted).
fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn parse_loose_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().ok()
}
