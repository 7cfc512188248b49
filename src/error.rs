//! Error types shared by the extractor, the ranker and the HTTP boundary.
//!
//! Per-URL fetch failures never surface here: they are collapsed into
//! placeholder rows by [`crate::extract`]. What remains are request-level
//! failures such as a missing link list or corpus file.

use std::path::PathBuf;

/// Request-level failure for either pipeline operation.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The link list or corpus CSV named by the caller does not exist.
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },
    /// Settings failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single page fetch.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Connection, timeout or body decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },
}

impl FetchError {
    /// Whether retrying the same request might succeed.
    ///
    /// Connection errors, timeouts, 5xx and 429 responses are transient;
    /// other 4xx responses and body decoding errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
        }
    }
}
