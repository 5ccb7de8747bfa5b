//! Render model for feed consumers
//!
//! The presentation layer draws a single flat list. Instead of splicing a
//! sentinel item into the content, the render list is a tagged union: content
//! entries followed by exactly one trailing loading marker. A marker with
//! `loading: true` renders as a spinner; `false` renders as nothing.

use crate::types::FeedItem;
use serde::{Deserialize, Serialize};

/// One entry of a render-ready feed list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderEntry {
    /// A content item
    Item(FeedItem),
    /// The synthetic trailing entry signaling in-flight fetch state
    LoadingMarker {
        /// Whether a fetch is currently in flight
        loading: bool,
    },
}

impl RenderEntry {
    /// Create a content entry
    pub fn item(item: FeedItem) -> Self {
        Self::Item(item)
    }

    /// Create a loading marker entry
    pub fn loading_marker(loading: bool) -> Self {
        Self::LoadingMarker { loading }
    }

    /// Check if this is a content entry
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Check if this is the loading marker
    pub fn is_loading_marker(&self) -> bool {
        matches!(self, Self::LoadingMarker { .. })
    }

    /// Get the content item, if any
    pub fn as_item(&self) -> Option<&FeedItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::LoadingMarker { .. } => None,
        }
    }
}

/// Build a render list: all items in order, then exactly one loading marker
pub fn render_list(items: &[FeedItem], loading: bool) -> Vec<RenderEntry> {
    let mut entries = Vec::with_capacity(items.len() + 1);
    entries.extend(items.iter().cloned().map(RenderEntry::Item));
    entries.push(RenderEntry::LoadingMarker { loading });
    entries
}

/// Number of content entries in a render list
pub fn content_count(entries: &[RenderEntry]) -> usize {
    entries.iter().filter(|e| e.is_item()).count()
}

/// The loading flag carried by the trailing marker
pub fn marker_loading(entries: &[RenderEntry]) -> bool {
    entries
        .iter()
        .rev()
        .find_map(|e| match e {
            RenderEntry::LoadingMarker { loading } => Some(*loading),
            RenderEntry::Item(_) => None,
        })
        .unwrap_or(false)
}
