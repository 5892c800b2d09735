//! Analysis service configuration

use phq_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/analyze";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Configuration for the analysis client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub request_timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

impl AnalysisConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PHQ_ANALYSIS_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint_path =
            lookup("PHQ_ANALYSIS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT_PATH.to_string());
        let request_timeout_ms = parse_millis(
            lookup("PHQ_ANALYSIS_TIMEOUT_MS"),
            "PHQ_ANALYSIS_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?;
        let probe_timeout_ms = parse_millis(
            lookup("PHQ_PROBE_TIMEOUT_MS"),
            "PHQ_PROBE_TIMEOUT_MS",
            DEFAULT_PROBE_TIMEOUT_MS,
        )?;

        Ok(Self {
            base_url,
            endpoint_path,
            request_timeout_ms,
            probe_timeout_ms,
        })
    }

    /// Create configuration with explicit base URL and default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }

    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    /// Override both timeouts. Values round down to whole milliseconds,
    /// with a floor of 1 ms.
    pub fn with_timeouts(mut self, request: Duration, probe: Duration) -> Self {
        self.request_timeout_ms = clamp_millis(request);
        self.probe_timeout_ms = clamp_millis(probe);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Base URL used by the liveness probe, always ending in `/`
    pub fn service_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.base_url.trim()).map_err(|e| {
            Error::Configuration(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "base URL '{}' must use http or https",
                self.base_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Submission URL, resolved under the base path
    pub fn endpoint_url(&self) -> Result<Url> {
        let path = self.endpoint_path.trim().trim_start_matches('/');
        self.service_url()?.join(path).map_err(|e| {
            Error::Configuration(format!(
                "invalid endpoint path '{}': {}",
                self.endpoint_path, e
            ))
        })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn clamp_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

fn parse_millis(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(Error::Configuration(format!("{key} must be greater than zero"))),
        Ok(value) => Ok(value),
        Err(_) => Err(Error::Configuration(format!(
            "{key} must be a whole number of milliseconds, got '{raw}'"
        ))),
    }
}
