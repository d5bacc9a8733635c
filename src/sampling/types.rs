//! Sample and fetch error definitions.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// One observed price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

impl Sample {
    pub fn new(value: f64, observed_at: DateTime<Utc>) -> Self {
        Self { value, observed_at }
    }
}

/// Coarse classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Timeout, connection failure, or non-success status.
    Transient,
    /// Response arrived but did not have the expected shape.
    DataShape,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Transient => f.write_str("transient"),
            FetchErrorKind::DataShape => f.write_str("data_shape"),
        }
    }
}

/// Errors that can occur while fetching a sample.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not complete within the deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Body could not be decoded or a field had the wrong type.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Expected field absent from the response.
    #[error("missing field '{0}' in response")]
    MissingField(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) | FetchError::Status(_) => {
                FetchErrorKind::Transient
            }
            FetchError::MalformedResponse(_) | FetchError::MissingField(_) => {
                FetchErrorKind::DataShape
            }
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
