//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how the client reaches the recipe API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the kernel (default: http://localhost:3000).
    pub api_url: Url,

    /// Per-request timeout (default: 30 seconds).
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from `PANTRY_API_URL` and `PANTRY_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let raw_url = env::var("PANTRY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).context("PANTRY_API_URL must be a valid URL")?;

        let timeout_secs = env::var("PANTRY_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .context("PANTRY_HTTP_TIMEOUT_SECS must be a valid u64")?;

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
