use crate::db::{init_db, Database};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Fresh database in its own temp dir. Keep the `TempDir` alive for the test.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.sqlite3");
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, db)
}

/// Body of a status response as the service sends it.
pub fn status_body(job_id: &str, status: &str, error: Option<&str>) -> Value {
    let mut body = json!({
        "jobId": job_id,
        "status": status,
        "progress": { "currentPage": 1, "totalPages": 3, "listingsScraped": 20 },
        "createdAt": "2024-05-01T12:00:00Z",
        "updatedAt": "2024-05-01T12:00:05Z"
    });
    if let Some(error) = error {
        body["error"] = json!(error);
    }
    body
}

pub fn listing(name: &str, address: &str, city: &str, state: &str, min: i64, max: i64) -> Value {
    json!({
        "propertyName": name,
        "address": address,
        "city": city,
        "state": state,
        "minPrice": min,
        "maxPrice": max,
        "beds": 1,
        "baths": 1,
        "sqft": 700
    })
}

/// Runs client code off the async runtime. The blocking reqwest client must be
/// built, used and dropped outside async context.
pub async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}
