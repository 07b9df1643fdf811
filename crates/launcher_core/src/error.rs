use std::time::Duration;

use shared::error::ApiError;
use thiserror::Error;

/// Failure to refresh one of the fetched lists.
///
/// The error is `Clone` so that every caller coalesced onto one in-flight
/// fetch receives the same outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("backend responded with status {0}")]
    Status(u16),
    #[error("backend error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to decode backend response: {0}")]
    Parse(String),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            FetchError::Parse(value.to_string())
        } else {
            FetchError::Network(value.to_string())
        }
    }
}
