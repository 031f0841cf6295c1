// src/domain/listing.rs

use serde::Serialize;
use serde_json::Value;

/// A lenient, flattened view of one scraped listing.
///
/// The service returns listings as opaque JSON and the client never validates
/// them, so every field is optional here. Numbers are accepted either as JSON
/// numbers or as numeric strings ("$1,250").
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingRow {
    // === Identity ===
    pub property_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    // === Pricing ===
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,

    // === Unit details ===
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub sqft: Option<f64>,
}

impl ListingRow {
    pub fn from_value(listing: &Value) -> Self {
        Self {
            property_name: text_field(listing, "propertyName"),
            address: text_field(listing, "address"),
            city: text_field(listing, "city"),
            state: text_field(listing, "state"),
            min_price: number_field(listing, "minPrice"),
            max_price: number_field(listing, "maxPrice"),
            beds: number_field(listing, "beds"),
            baths: number_field(listing, "baths"),
            sqft: number_field(listing, "sqft"),
        }
    }

    /// Midpoint of the price range, or whichever bound is known.
    pub fn avg_price(&self) -> Option<f64> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }
}

pub fn rows_from_results(results: &[Value]) -> Vec<ListingRow> {
    results.iter().map(ListingRow::from_value).collect()
}

fn text_field(listing: &Value, key: &str) -> Option<String> {
    match listing.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite numbers only; "NaN" and "inf" strings would poison the summary.
fn number_field(listing: &Value, key: &str) -> Option<f64> {
    let value = match listing.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    };
    value.filter(|v| v.is_finite())
}
