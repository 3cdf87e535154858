use crate::series::error::SeriesError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode archive response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Archive response from {url} has no daily field '{field}'")]
    MissingField { url: String, field: String },

    #[error("Archive response from {url} is not a valid daily series")]
    MalformedSeries {
        url: String,
        #[source]
        source: SeriesError,
    },

    #[error("Fetch did not complete within {0:?}")]
    Timeout(Duration),
}
