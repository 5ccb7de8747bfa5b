//! Feed source configuration
//!
//! A feed definition is a small YAML file describing the paged API and the
//! request options to reach it:
//!
//! ```yaml
//! source:
//!   base_url: https://api.example.com
//!   path: /v1/feed
//!   page_param: page
//!   per_page_param: perPage
//!   per_page: 10
//! request:
//!   timeout_secs: 10
//!   headers:
//!     X-Api-Key: secret
//! ```

use crate::error::{Error, Result};
use crate::fetch::HttpFetcherConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// A complete feed definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// The paged source to fetch from
    pub source: SourceConfig,
    /// Request options
    #[serde(default)]
    pub request: RequestOptions,
}

/// Description of a paged API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the API
    pub base_url: String,
    /// Path of the paged endpoint
    #[serde(default = "default_path")]
    pub path: String,
    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Optional query parameter carrying the page size
    #[serde(default)]
    pub per_page_param: Option<String>,
    /// Page size
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Request options applied to every fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            headers: HashMap::new(),
        }
    }
}

fn default_path() -> String {
    "/items".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_per_page() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

impl FeedConfig {
    /// Load a feed definition from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a feed definition from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the definition
    pub fn validate(&self) -> Result<()> {
        if self.source.base_url.is_empty() {
            return Err(Error::missing_field("source.base_url"));
        }
        let _: url::Url = self.source.base_url.parse()?;

        if self.source.per_page == 0 {
            return Err(Error::invalid_value(
                "source.per_page",
                "must be greater than zero",
            ));
        }
        if self.source.page_param.is_empty() {
            return Err(Error::invalid_value(
                "source.page_param",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Build the HTTP fetcher config for this definition
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        let mut builder = HttpFetcherConfig::builder()
            .base_url(&self.source.base_url)
            .path(&self.source.path)
            .page_param(&self.source.page_param)
            .timeout(Duration::from_secs(self.request.timeout_secs));

        if let Some(param) = &self.source.per_page_param {
            builder = builder.per_page(param, self.source.per_page);
        }
        for (key, value) in &self.request.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}
