//! HTTP page fetcher
//!
//! Fetches pages from a JSON API with the page number as a query parameter.
//! One request per page, no transport retries: a failed page is surfaced to
//! the controller, and the next refresh or end-reached gesture is the retry
//! path.

use super::PageFetcher;
use crate::error::{Error, Result};
use crate::types::Page;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Base URL of the API
    pub base_url: String,
    /// Path of the paged endpoint
    pub path: String,
    /// Query parameter carrying the page number
    pub page_param: String,
    /// Optional query parameter carrying the page size
    pub per_page_param: Option<String>,
    /// Page size sent with `per_page_param`
    pub per_page: Option<u32>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            path: "/items".to_string(),
            page_param: "page".to_string(),
            per_page_param: None,
            per_page: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("feedkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpFetcherConfig {
    /// Create a new config builder
    pub fn builder() -> HttpFetcherConfigBuilder {
        HttpFetcherConfigBuilder::default()
    }
}

/// Builder for HTTP fetcher config
#[derive(Default)]
pub struct HttpFetcherConfigBuilder {
    config: HttpFetcherConfig,
}

impl HttpFetcherConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the endpoint path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the page number parameter name
    pub fn page_param(mut self, param: impl Into<String>) -> Self {
        self.config.page_param = param.into();
        self
    }

    /// Send a page size with every request
    pub fn per_page(mut self, param: impl Into<String>, value: u32) -> Self {
        self.config.per_page_param = Some(param.into());
        self.config.per_page = Some(value);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpFetcherConfig {
        self.config
    }
}

/// HTTP page fetcher
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: Client,
    config: HttpFetcherConfig,
    endpoint: Url,
}

impl HttpPageFetcher {
    /// Create a fetcher from a config
    ///
    /// Fails if the base URL plus path does not parse as a URL.
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }

        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.path.trim_start_matches('/')
        );
        let endpoint: Url = endpoint.parse()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Create a fetcher for a base URL with default settings
    pub fn for_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(HttpFetcherConfig::builder().base_url(base_url).build())
    }

    /// The resolved endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(&self.config.page_param, &page.to_string());
            if let (Some(param), Some(value)) = (&self.config.per_page_param, self.config.per_page)
            {
                pairs.append_pair(param, &value.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let url = self.page_url(page);

        let mut req = self.client.get(url.clone());
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let payload: Page = response.json().await.map_err(Error::Http)?;

        debug!(
            page,
            records = payload.records.len(),
            total = payload.pagination.total_count,
            "fetched page"
        );

        Ok(payload)
    }
}
