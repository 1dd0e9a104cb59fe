//! Endpoint configuration for the identity service client. Values are public;
//! do not store secrets here.

use super::error::ApiError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://tearofserver.store";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl ClientConfig {
    /// # Errors
    /// Returns `ApiError::Config` when the base URL is not an absolute http(s) URL.
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = api_base_url.trim();
        let url = Url::parse(trimmed)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ApiError::Config(format!(
                    "Unsupported API base URL scheme: {scheme}"
                )))
            }
        }

        if url.host().is_none() {
            return Err(ApiError::Config(format!(
                "API base URL has no host: {trimmed}"
            )));
        }

        Ok(Self {
            api_base_url: trimmed.to_string(),
            timeout,
        })
    }

    /// Joins the base URL and `path`, tolerating stray slashes on either side.
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        let base = self.api_base_url.trim().trim_end_matches('/');
        let path = path.trim();

        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}
