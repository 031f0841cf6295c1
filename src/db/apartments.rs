use crate::db::connection::Database;
use crate::domain::ListingRow;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::params;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentRecord {
    pub id: i64,
    pub name: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Upserts listings keyed by (address, city, state). An existing row only gets
/// its prices and `updated_at` refreshed.
///
/// Listings without an address, city or state cannot be keyed and are skipped.
/// Returns how many rows were written.
pub fn save_listings(db: &Database, rows: &[ListingRow]) -> AppResult<usize> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| AppError::DbError(e.to_string()))?;

        let mut saved = 0;
        for row in rows {
            let (Some(address), Some(city), Some(state)) = (&row.address, &row.city, &row.state)
            else {
                warn!(
                    name = ?row.property_name,
                    "Skipping listing without address/city/state"
                );
                continue;
            };

            tx.execute(
                r#"
                INSERT INTO apartments (name, address, city, state, min_price, max_price, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                ON CONFLICT (address, city, state) DO UPDATE SET
                    min_price = excluded.min_price,
                    max_price = excluded.max_price,
                    updated_at = excluded.updated_at
                "#,
                params![
                    row.property_name,
                    address,
                    city,
                    state,
                    row.min_price,
                    row.max_price,
                    now
                ],
            )
            .map_err(|e| AppError::DbError(e.to_string()))?;
            saved += 1;
        }

        tx.commit()
            .map_err(|e| AppError::DbError(e.to_string()))?;
        Ok(saved)
    })
}

/// All saved apartments, optionally limited to one state, ordered by city and
/// address.
pub fn list_apartments(db: &Database, state: Option<&str>) -> AppResult<Vec<ApartmentRecord>> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, name, address, city, state, min_price, max_price, created_at, updated_at
                FROM apartments
                WHERE ?1 IS NULL OR state = ?1
                ORDER BY city, address
                "#,
            )
            .map_err(|e| AppError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(params![state], |row| {
                Ok(ApartmentRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    city: row.get(3)?,
                    state: row.get(4)?,
                    min_price: row.get(5)?,
                    max_price: row.get(6)?,
                    created_at: row.get(7)?,
                    updated_at: row.get(8)?,
                })
            })
            .map_err(|e| AppError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| AppError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}
