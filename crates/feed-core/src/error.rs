use std::io;
use thiserror::Error;

/// Failure reported by a listing source adapter.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Whether this error is the search backend's way of saying there are no
    /// further pages. Wrapped errors that only expose the status in their text
    /// are recognized too.
    pub fn is_page_boundary(&self) -> bool {
        match self {
            SourceError::Status { status: 400, .. } => true,
            other => other.to_string().contains("400"),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SourceError::Network(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Push rejected (status {status}): {body}")]
    PushRejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, FeedError>;
