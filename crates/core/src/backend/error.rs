use crate::domain::payload::PayloadError;
use reqwest::StatusCode;

/// Transport-level failures. The dashboard shows a fixed message for every
/// variant; the detail only reaches the logs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("backend request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("backend HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read backend response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("backend response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl FetchError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Status { .. } => "http",
            Self::Body(_) => "body",
            Self::InvalidJson(_) => "json",
            Self::Payload(_) => "payload",
        }
    }
}
