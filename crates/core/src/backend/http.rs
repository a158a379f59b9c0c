use crate::backend::{FetchError, PayloadSource};
use crate::config::Settings;
use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_PATH: &str = "/company";
const DEFAULT_RETRIES: u32 = 1;
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: String,
    path: String,
    retries: u32,
}

impl HttpBackendClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_backend_base_url()?.to_string();
        let path = settings
            .backend_company_path
            .clone()
            .unwrap_or_else(|| DEFAULT_PATH.to_string());
        let timeout = settings.backend_timeout_secs.map(Duration::from_secs);
        let retries = settings.backend_retries.unwrap_or(DEFAULT_RETRIES);

        Self::new(base_url, path, timeout, retries)
    }

    /// `timeout: None` waits indefinitely. `retries` is the total number of
    /// attempts and is clamped to at least one.
    pub fn new(
        base_url: impl Into<String>,
        path: impl Into<String>,
        timeout: Option<Duration>,
        retries: u32,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build backend http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            path: path.into(),
            retries: retries.max(1),
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_once(&self, symbol: &str) -> Result<Value, FetchError> {
        let res = self
            .http
            .get(self.url())
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        let text = res.text().await.map_err(FetchError::Body)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        serde_json::from_str::<Value>(&text).map_err(FetchError::InvalidJson)
    }
}

#[async_trait::async_trait]
impl PayloadSource for HttpBackendClient {
    fn source_name(&self) -> &'static str {
        "backend_http"
    }

    async fn fetch_payload(&self, symbol: &str) -> Result<Value, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(symbol).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1).min(5));
                    tracing::warn!(attempt, ?backoff, symbol, error = %err, "backend fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
