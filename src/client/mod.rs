mod batch;
mod client;
mod client_error;
mod models;

pub use batch::{poll_many, DEFAULT_MAX_WORKERS};
pub use client::{
    job_id_of, results_of, ApartmentScraperClient, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use client_error::ClientError;
pub use models::{JobState, JobStatus, Progress, ScrapeRequest, DEFAULT_MAX_PAGES};
