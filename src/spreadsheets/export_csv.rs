use crate::domain::ListingRow;
use crate::errors::{AppError, AppResult};
use crate::spreadsheets::LISTING_HEADERS;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a header row plus one row per listing. Missing values are empty cells.
pub fn write_listings_csv<W: Write>(rows: &[ListingRow], writer: W) -> AppResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(LISTING_HEADERS)
        .map_err(|e| AppError::ExportError(format!("Failed to write CSV header: {e}")))?;

    for row in rows {
        let record = [
            text(&row.property_name),
            text(&row.address),
            text(&row.city),
            text(&row.state),
            number(row.min_price),
            number(row.max_price),
            number(row.avg_price()),
            number(row.beds),
            number(row.baths),
            number(row.sqft),
        ];
        wtr.write_record(&record)
            .map_err(|e| AppError::ExportError(format!("Failed to write CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::ExportError(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

pub fn export_listings_csv(rows: &[ListingRow], path: &Path) -> AppResult<()> {
    let file = File::create(path).map_err(|source| AppError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    write_listings_csv(rows, file)
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

// 1500.0 -> "1500", 1.5 -> "1.5"
fn number(v: Option<f64>) -> String {
    match v {
        Some(n) if n.fract() == 0.0 => format!("{n:.0}"),
        Some(n) => n.to_string(),
        None => String::new(),
    }
}
