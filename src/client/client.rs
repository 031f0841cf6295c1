// client.rs
use crate::client::{ClientError, JobState, JobStatus, ScrapeRequest};
use crate::config::ClientConfig;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("apartment-scraper-client/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Blocking client for the scrape API. Holds one pooled HTTP client, so clone
/// or share it by reference rather than building a new one per call.
#[derive(Debug, Clone)]
pub struct ApartmentScraperClient {
    base_url: String,
    client: Client,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ApartmentScraperClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, ClientError> {
        Self::build(base_url, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Builds a client whose poll interval and timeout come from `config`
    /// instead of the defaults.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::build(
            &config.base_url,
            config.api_key.as_deref(),
            config.request_timeout,
        )?;

        Ok(Self {
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
            ..client
        })
    }

    fn build(
        base_url: &str,
        api_key: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            base_url,
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /api/scrape/start. Returns the raw body, which carries `jobId` and
    /// the initial `status`.
    pub fn start_scrape(&self, request: &ScrapeRequest) -> Result<Value, ClientError> {
        let url = self.endpoint("/api/scrape/start");
        debug!(%url, city = %request.city, state = %request.state, "starting scrape");

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()?
            .error_for_status()?;

        Ok(resp.json()?)
    }

    pub fn get_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.endpoint(&format!("/api/scrape/status/{job_id}"));
        debug!(%url, "fetching job status");

        let resp = self.client.get(&url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Results payload as sent by the service; listings are not validated.
    pub fn get_results(&self, job_id: &str) -> Result<Value, ClientError> {
        let url = self.endpoint(&format!("/api/scrape/results/{job_id}"));
        debug!(%url, "fetching job results");

        let resp = self.client.get(&url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    pub fn cancel_job(&self, job_id: &str) -> Result<Value, ClientError> {
        let url = self.endpoint(&format!("/api/scrape/cancel/{job_id}"));
        debug!(%url, "cancelling job");

        let resp = self.client.post(&url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Polls the job every `interval` until it reaches a terminal status.
    ///
    /// - `completed` returns the results payload.
    /// - `failed` returns [`ClientError::JobFailed`] with the server's message.
    /// - `cancelled` returns [`ClientError::JobCancelled`].
    ///
    /// If `timeout` elapses first the result is [`ClientError::Timeout`]. Any
    /// request error aborts the loop immediately.
    pub fn poll_until_complete(
        &self,
        job_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Value, ClientError> {
        let started = Instant::now();

        while started.elapsed() < timeout {
            let status = self.get_status(job_id)?;

            match status.status {
                JobState::Completed => return self.get_results(job_id),
                JobState::Failed => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "no error message reported".to_string());
                    return Err(ClientError::JobFailed(message));
                }
                JobState::Cancelled => return Err(ClientError::JobCancelled),
                JobState::Pending | JobState::Processing => {}
            }

            info!(
                job_id,
                "Status: {} - Page {}/{} - Scraped: {}",
                status.status,
                status.progress.current_page,
                status.progress.total_pages,
                status.progress.listings_scraped
            );

            std::thread::sleep(interval);
        }

        Err(ClientError::Timeout(timeout))
    }

    /// Starts a job, waits for it with this client's poll timeout and returns
    /// the `results` list of the final payload.
    pub fn scrape_and_wait(
        &self,
        request: &ScrapeRequest,
        poll_interval: Duration,
    ) -> Result<Vec<Value>, ClientError> {
        let started = self.start_scrape(request)?;
        let job_id = job_id_of(&started)?;

        info!(%job_id, "Job started");

        let payload = self.poll_until_complete(&job_id, poll_interval, self.poll_timeout)?;
        results_of(payload)
    }
}

/// Pulls `jobId` out of a start response.
pub fn job_id_of(started: &Value) -> Result<String, ClientError> {
    started
        .get("jobId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ClientError::MissingField("jobId"))
}

/// Takes the `results` array out of a results payload.
pub fn results_of(payload: Value) -> Result<Vec<Value>, ClientError> {
    match payload {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => Ok(results),
            _ => Err(ClientError::MissingField("results")),
        },
        _ => Err(ClientError::MissingField("results")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = ApartmentScraperClient::new("https://example.test//", None).unwrap();
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(
            client.endpoint("/api/scrape/start"),
            "https://example.test/api/scrape/start"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = ApartmentScraperClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn new_client_uses_default_poll_settings() {
        let client = ApartmentScraperClient::new("https://example.test", None).unwrap();
        assert_eq!(client.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(client.poll_timeout(), DEFAULT_POLL_TIMEOUT);
    }

    #[test]
    fn config_poll_settings_are_carried_over() {
        let config = ClientConfig {
            base_url: "https://example.test".into(),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(45),
            ..ClientConfig::default()
        };

        let client = ApartmentScraperClient::from_config(&config).unwrap();
        assert_eq!(client.poll_interval(), Duration::from_secs(2));
        assert_eq!(client.poll_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn job_id_is_read_from_start_response() {
        let id = job_id_of(&json!({ "jobId": "j-1", "status": "pending" })).unwrap();
        assert_eq!(id, "j-1");

        let err = job_id_of(&json!({ "status": "pending" })).unwrap_err();
        assert!(matches!(err, ClientError::MissingField("jobId")));
    }

    #[test]
    fn results_field_is_extracted() {
        let results = results_of(json!({ "results": [{ "a": 1 }, { "a": 2 }], "total": 2 }))
            .unwrap();
        assert_eq!(results, vec![json!({ "a": 1 }), json!({ "a": 2 })]);

        assert!(results_of(json!({ "results": "nope" })).is_err());
        assert!(results_of(json!([])).is_err());
    }
}
