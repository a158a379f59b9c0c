pub mod backend;
pub mod dashboard;
pub mod domain;
pub mod normalize;
pub mod render;

pub mod config {
    use crate::dashboard::FailurePolicy;
    use anyhow::Context;
    use std::str::FromStr;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub backend_base_url: Option<String>,
        pub backend_company_path: Option<String>,
        pub backend_timeout_secs: Option<u64>,
        pub backend_retries: Option<u32>,
        pub failure_policy: FailurePolicy,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        /// Unset or blank variables fall back to defaults; values that are set
        /// but do not parse are rejected.
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                backend_base_url: non_blank(std::env::var("BACKEND_BASE_URL").ok()),
                backend_company_path: non_blank(std::env::var("BACKEND_COMPANY_PATH").ok()),
                backend_timeout_secs: parse_var(
                    "BACKEND_TIMEOUT_SECS",
                    std::env::var("BACKEND_TIMEOUT_SECS").ok(),
                )?,
                backend_retries: parse_var(
                    "BACKEND_RETRIES",
                    std::env::var("BACKEND_RETRIES").ok(),
                )?,
                failure_policy: parse_var(
                    "DASHBOARD_FAILURE_POLICY",
                    std::env::var("DASHBOARD_FAILURE_POLICY").ok(),
                )?
                .unwrap_or_default(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_backend_base_url(&self) -> anyhow::Result<&str> {
            self.backend_base_url
                .as_deref()
                .context("BACKEND_BASE_URL is required")
        }
    }

    fn non_blank(raw: Option<String>) -> Option<String> {
        raw.filter(|s| !s.trim().is_empty())
    }

    fn parse_var<T>(key: &str, raw: Option<String>) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let Some(raw) = non_blank(raw) else {
            return Ok(None);
        };
        let value = raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid {key}: `{raw}`"))?;
        Ok(Some(value))
    }

}
