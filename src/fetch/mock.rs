//! Static page fetcher
//!
//! Pages a fixed in-memory dataset. Stands in for a real API in tests, demos,
//! and the built-in mock server, with optional artificial latency and
//! per-page failure injection.

use super::PageFetcher;
use crate::error::{Error, Result};
use crate::types::{FeedItem, Page, PageInfo};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Slice a dataset into one page of the wire format
///
/// Pages are 1-based; a page number of 0 is treated as 1. A page past the end
/// yields an empty records list with `page_count` 0.
pub fn paginate(items: &[FeedItem], page: u32, per_page: u32) -> Page {
    let page = page.max(1);
    let start = ((page - 1) as usize).saturating_mul(per_page as usize);
    let end = start.saturating_add(per_page as usize).min(items.len());
    let records: Vec<FeedItem> = if start >= items.len() {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };

    let pagination = PageInfo::new(page, per_page, records.len() as u32, items.len() as u32);
    Page::new(pagination, records)
}

/// Generate a dataset of numbered items
pub fn sample_items(count: u32) -> Vec<FeedItem> {
    (1..=count)
        .map(|i| FeedItem::new(format!("Item {i}"), format!("Description of item {i}")))
        .collect()
}

/// Page fetcher backed by a fixed dataset
pub struct StaticPageFetcher {
    items: Vec<FeedItem>,
    per_page: u32,
    latency: Duration,
    fail_pages: HashSet<u32>,
    calls: AtomicU32,
}

impl StaticPageFetcher {
    /// Create a fetcher over an explicit dataset
    pub fn new(items: Vec<FeedItem>, per_page: u32) -> Self {
        Self {
            items,
            per_page,
            latency: Duration::ZERO,
            fail_pages: HashSet::new(),
            calls: AtomicU32::new(0),
        }
    }

    /// Create a fetcher over a generated dataset of `count` items
    pub fn generated(count: u32, per_page: u32) -> Self {
        Self::new(sample_items(count), per_page)
    }

    /// Sleep this long before answering each fetch
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every fetch of the given page
    #[must_use]
    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_pages.insert(page);
        self
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total items in the dataset
    pub fn total_count(&self) -> u32 {
        self.items.len() as u32
    }
}

impl std::fmt::Debug for StaticPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPageFetcher")
            .field("items", &self.items.len())
            .field("per_page", &self.per_page)
            .field("latency", &self.latency)
            .field("fail_pages", &self.fail_pages)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fail_pages.contains(&page) {
            return Err(Error::fetch(format!("injected failure for page {page}")));
        }

        Ok(paginate(&self.items, page, self.per_page))
    }
}
