use crate::client::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "SCRAPER_API_URL";
pub const ENV_API_KEY: &str = "SCRAPER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://apartment-scraper.workers.dev";

/// Connection and polling settings for [`crate::ApartmentScraperClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads `SCRAPER_API_URL` and `SCRAPER_API_KEY`; anything unset keeps its
    /// default. An empty key counts as no key.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            base_url: lookup(ENV_BASE_URL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            api_key: lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()),
            ..defaults
        }
    }
}
