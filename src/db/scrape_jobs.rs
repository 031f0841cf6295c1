use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub job_id: String,
    pub city: String,
    pub state: String,
    pub status: String,
    pub listings: i64,
    pub error_message: Option<String>,
    pub recorded_at: NaiveDateTime,
}

/// Inserts or replaces the record for `job.job_id`.
pub fn record_job(conn: &Connection, job: &JobRecord) -> AppResult<()> {
    conn.execute(
        r#"
        INSERT INTO scrape_jobs (job_id, city, state, status, listings, error_message, recorded_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT (job_id) DO UPDATE SET
            status = excluded.status,
            listings = excluded.listings,
            error_message = excluded.error_message,
            recorded_at = excluded.recorded_at
        "#,
        params![
            job.job_id,
            job.city,
            job.state,
            job.status,
            job.listings,
            job.error_message,
            job.recorded_at
        ],
    )
    .map_err(|e| AppError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_recent_jobs(conn: &Connection) -> AppResult<Vec<JobRecord>> {
    let mut stmt = conn
        .prepare("SELECT job_id, city, state, status, listings, error_message, recorded_at FROM scrape_jobs ORDER BY recorded_at DESC LIMIT 50")
        .map_err(|e| AppError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(JobRecord {
                job_id: row.get(0)?,
                city: row.get(1)?,
                state: row.get(2)?,
                status: row.get(3)?,
                listings: row.get(4)?,
                error_message: row.get(5)?,
                recorded_at: row.get(6)?,
            })
        })
        .map_err(|e| AppError::DbError(e.to_string()))?;

    let mut jobs = Vec::new();
    for r in rows {
        jobs.push(r.map_err(|e| AppError::DbError(e.to_string()))?);
    }
    Ok(jobs)
}
