use crate::api::{
    config::{ClientConfig, DEFAULT_TIMEOUT_SECONDS},
    error::ApiError,
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::time::Duration;

use super::commands::{ARG_API_URL, ARG_TIMEOUT};

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, timeout: Duration) -> Self {
        Self { api_url, timeout }
    }

    /// # Errors
    /// Returns an error if the API URL is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;
        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Ok(Self::new(api_url, Duration::from_secs(timeout)))
    }

    /// # Errors
    /// Returns `ApiError::Config` when the API URL is not a usable http(s) URL.
    pub fn client_config(&self) -> Result<ClientConfig, ApiError> {
        ClientConfig::new(&self.api_url, self.timeout)
    }
}
