pub mod error;
pub mod http;

pub use error::FetchError;
pub use http::HttpBackendClient;

use serde_json::Value;

/// Fetch collaborator for the `/company` lookup.
///
/// Implementations own transport concerns (timeouts, retries); the dashboard
/// pipeline waits on `fetch_payload` for as long as it takes.
#[async_trait::async_trait]
pub trait PayloadSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_payload(&self, symbol: &str) -> Result<Value, FetchError>;
}

/// Serves a fixed document, e.g. a payload read from disk.
///
/// Raw text is parsed on every fetch, so a malformed file surfaces as a
/// `FetchError` inside the pipeline like any other bad response body.
#[derive(Debug, Clone)]
pub struct StaticPayload {
    body: StaticBody,
}

#[derive(Debug, Clone)]
enum StaticBody {
    Json(Value),
    Text(String),
}

impl StaticPayload {
    pub fn new(value: Value) -> Self {
        Self {
            body: StaticBody::Json(value),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            body: StaticBody::Text(text.into()),
        }
    }
}

#[async_trait::async_trait]
impl PayloadSource for StaticPayload {
    fn source_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_payload(&self, _symbol: &str) -> Result<Value, FetchError> {
        match &self.body {
            StaticBody::Json(value) => Ok(value.clone()),
            StaticBody::Text(text) => {
                serde_json::from_str::<Value>(text).map_err(FetchError::InvalidJson)
            }
        }
    }
}
