use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Invalid station request URL '{url}': {reason}")]
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

    #[error("Failed to parse station data from {0}")]
    Decode(String, #[source] reqwest::Error),
}
