//! Page fetchers
//!
//! The feed controller talks to its data source through the [`PageFetcher`]
//! trait: "deliver page N, asynchronously, as a typed payload or a typed
//! failure."
//!
//! # Overview
//!
//! Two implementations ship with the crate:
//! - [`HttpPageFetcher`] fetches pages from a JSON API using a page-number
//!   query parameter
//! - [`StaticPageFetcher`] pages a generated in-memory dataset, with optional
//!   latency and failure injection for tests and demos

mod client;
mod mock;

pub use client::{HttpFetcherConfig, HttpFetcherConfigBuilder, HttpPageFetcher};
pub use mock::{paginate, sample_items, StaticPageFetcher};

use crate::error::Result;
use crate::types::Page;
use async_trait::async_trait;

/// A source of pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch page `page` (1-based)
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}
