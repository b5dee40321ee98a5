use reqwest::StatusCode;

/// Failure of a single fetch. None of these stop the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
}
