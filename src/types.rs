//! Common types used throughout feedkit
//!
//! Defines the wire format shared by the fetchers, the mock server, and the
//! feed controller: an opaque feed item, the pagination metadata attached to
//! every page, and the page payload itself.

use serde::{Deserialize, Serialize};

// ============================================================================
// Feed Item
// ============================================================================

/// One entry in a feed
///
/// Opaque content: the controller accumulates and re-emits items but never
/// inspects them beyond pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item title
    pub title: String,
    /// Item description
    pub description: String,
}

impl FeedItem {
    /// Create a new feed item
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

// ============================================================================
// Pagination Metadata
// ============================================================================

/// Pagination metadata describing one page's position in the result set
///
/// Wire format is camelCase (`page`, `perPage`, `pageCount`, `totalCount`).
/// The in-flight loading flag is controller-local state and is never part of
/// this payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page number, 1-based
    pub page: u32,
    /// Requested items per page
    pub per_page: u32,
    /// Items actually returned in this page
    pub page_count: u32,
    /// Total items available across all pages
    pub total_count: u32,
}

impl PageInfo {
    /// Create pagination metadata
    pub fn new(page: u32, per_page: u32, page_count: u32, total_count: u32) -> Self {
        Self {
            page,
            per_page,
            page_count,
            total_count,
        }
    }

    /// Whether this page is the last one
    ///
    /// `total_count <= (page - 1) * per_page + page_count`, which assumes
    /// uniform page sizes except possibly the last.
    pub fn is_last_page(&self) -> bool {
        let seen = self
            .page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .saturating_add(self.page_count);
        self.total_count <= seen
    }
}

// ============================================================================
// Page Payload
// ============================================================================

/// One fetched batch: pagination metadata plus the records of that page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Metadata describing this page's position
    pub pagination: PageInfo,
    /// The items of this page, in order
    pub records: Vec<FeedItem>,
}

impl Page {
    /// Create a page payload
    pub fn new(pagination: PageInfo, records: Vec<FeedItem>) -> Self {
        Self {
            pagination,
            records,
        }
    }
}
