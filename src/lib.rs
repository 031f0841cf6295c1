//! Client-side tooling for the apartment scraper service.
//!
//! [`client`] wraps the service's REST API (start, poll, cancel, fetch results),
//! [`analyzer`] inspects a saved HTML snapshot, and the remaining modules turn
//! scraped listings into summaries, spreadsheets and local database rows.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod spreadsheets;
pub mod telemetry;

pub use client::{ApartmentScraperClient, ClientError, JobState, JobStatus, ScrapeRequest};
pub use config::ClientConfig;
pub use errors::{AppError, AppResult};

#[cfg(test)]
mod tests;
