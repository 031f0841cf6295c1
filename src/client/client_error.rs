use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid API key: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    /// Transport failures and non-2xx responses, exactly as reqwest reports them.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job was cancelled")]
    JobCancelled,

    #[error("Job did not complete within {:?}", .0)]
    Timeout(Duration),

    #[error("Response is missing field '{0}'")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let err = ClientError::Timeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Job did not complete within 200ms");

        let err = ClientError::Timeout(Duration::from_secs(300));
        assert_eq!(err.to_string(), "Job did not complete within 300s");
    }
}
