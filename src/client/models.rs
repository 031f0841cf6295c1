use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_MAX_PAGES: u32 = 5;

// ScrapeRequest (wire shape)
//  ├── city
//  ├── state
//  ├── maxPages
//  └── filters?        (omitted when absent or empty)
//       ├── minPrice
//       ├── maxPrice
//       └── beds       [1, 2]

/// Parameters for a new scrape job. Built once by the caller and never mutated
/// by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeRequest {
    pub city: String,
    pub state: String,
    #[serde(rename = "maxPages")]
    pub max_pages: u32,
    #[serde(skip_serializing_if = "filters_absent")]
    pub filters: Option<Map<String, Value>>,
}

fn filters_absent(filters: &Option<Map<String, Value>>) -> bool {
    filters.as_ref().map_or(true, Map::is_empty)
}

impl ScrapeRequest {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            max_pages: DEFAULT_MAX_PAGES,
            filters: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_filters(mut self, filters: Map<String, Value>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Adds a single filter entry, e.g. `.filter("minPrice", 1000)`.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Lifecycle of a job as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub listings_scraped: u64,
}

/// One decoded answer from the status endpoint. A fresh value is built on every
/// poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub progress: Progress,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_without_filters_omits_key() {
        let req = ScrapeRequest::new("austin", "tx").with_max_pages(2);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({ "city": "austin", "state": "tx", "maxPages": 2 })
        );
    }

    #[test]
    fn empty_filter_map_is_treated_as_absent() {
        let req = ScrapeRequest::new("austin", "tx").with_filters(Map::new());
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("filters").is_none());
        assert_eq!(body["maxPages"], 5);
    }

    #[test]
    fn filter_builder_collects_entries() {
        let req = ScrapeRequest::new("atlanta", "ga")
            .filter("minPrice", 1000)
            .filter("maxPrice", 3000)
            .filter("beds", json!([1, 2]));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body["filters"],
            json!({ "minPrice": 1000, "maxPrice": 3000, "beds": [1, 2] })
        );
    }

    #[test]
    fn status_decodes_with_optional_fields_missing() {
        let status: JobStatus = serde_json::from_value(json!({
            "jobId": "abc",
            "status": "processing",
            "progress": { "currentPage": 1, "totalPages": 3, "listingsScraped": 20 },
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:01:00Z"
        }))
        .unwrap();

        assert_eq!(status.status, JobState::Processing);
        assert_eq!(status.progress.total_pages, 3);
        assert!(status.completed_at.is_none());
        assert!(status.error.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let res: Result<JobStatus, _> = serde_json::from_value(json!({
            "jobId": "abc",
            "status": "exploded",
            "createdAt": "x",
            "updatedAt": "y"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn status_without_progress_defaults_to_zeros() {
        let status: JobStatus = serde_json::from_value(json!({
            "jobId": "abc",
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(status.status, JobState::Pending);
        assert_eq!(status.progress, Progress::default());
        assert_eq!(status.progress.listings_scraped, 0);
    }

    #[test]
    fn partial_progress_fills_missing_counters() {
        let status: JobStatus = serde_json::from_value(json!({
            "jobId": "abc",
            "status": "processing",
            "progress": { "currentPage": 2 },
            "createdAt": "x",
            "updatedAt": "y"
        }))
        .unwrap();

        assert_eq!(status.progress.current_page, 2);
        assert_eq!(status.progress.total_pages, 0);
        assert_eq!(status.progress.listings_scraped, 0);
    }
}
