//! Configuration schema for mensa
//!
//! All fields use #[serde(default)] where a sensible default exists so that
//! partial configs keep loading as new options are added.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

fn default_timeout_secs() -> u64 {
    30
}

/// Main configuration structure for mensa
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MensaConfig {
    /// Base URL of the remote meal-ordering API (e.g. "https://mensa.example.com")
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl MensaConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the configuration
    ///
    /// The API base URL is required and must be a well-formed http(s) URL;
    /// everything downstream joins paths onto it.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api_base_url.trim().is_empty() {
            errors.push("api_base_url must not be empty".to_string());
        } else {
            match Url::parse(&self.api_base_url) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                Ok(url) => errors.push(format!(
                    "api_base_url has unsupported scheme '{}' (expected http or https)",
                    url.scheme()
                )),
                Err(e) => errors.push(format!("api_base_url is not a valid URL: {}", e)),
            }
        }

        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Parse the configured base URL
    pub fn base_url(&self) -> Result<Url> {
        use anyhow::Context;
        Url::parse(&self.api_base_url).context("invalid api_base_url in configuration")
    }
}
