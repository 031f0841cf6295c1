// src/domain/summary.rs

use crate::domain::listing::ListingRow;
use std::fmt;

/// count / mean / min / max over the listings that have a value for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut stats = ColumnStats::default();
        let mut sum = 0.0;

        for v in values {
            stats.count += 1;
            sum += v;
            stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
            stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
        }

        if stats.count > 0 {
            stats.mean = Some(sum / stats.count as f64);
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub listings: usize,
    pub beds: ColumnStats,
    pub baths: ColumnStats,
    pub sqft: ColumnStats,
    pub avg_price: ColumnStats,
}

pub fn summarize(rows: &[ListingRow]) -> ListingSummary {
    ListingSummary {
        listings: rows.len(),
        beds: ColumnStats::from_values(rows.iter().filter_map(|r| r.beds)),
        baths: ColumnStats::from_values(rows.iter().filter_map(|r| r.baths)),
        sqft: ColumnStats::from_values(rows.iter().filter_map(|r| r.sqft)),
        avg_price: ColumnStats::from_values(rows.iter().filter_map(ListingRow::avg_price)),
    }
}

fn cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for ListingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary Statistics ({} listings):", self.listings)?;
        writeln!(
            f,
            "{:<10} {:>8} {:>12} {:>12} {:>12}",
            "", "count", "mean", "min", "max"
        )?;
        for (name, stats) in [
            ("beds", &self.beds),
            ("baths", &self.baths),
            ("sqft", &self.sqft),
            ("avgPrice", &self.avg_price),
        ] {
            writeln!(
                f,
                "{:<10} {:>8} {:>12} {:>12} {:>12}",
                name,
                stats.count,
                cell(stats.mean),
                cell(stats.min),
                cell(stats.max)
            )?;
        }
        Ok(())
    }
}
