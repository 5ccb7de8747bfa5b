//! Feed state machine
//!
//! States are `{Idle, Loading}` crossed with the pagination metadata and the
//! accumulated items. Transitions are driven by four events; applying an
//! event returns the side effects the owner must carry out.

use crate::render::{render_list, RenderEntry};
use crate::types::{FeedItem, Page, PageInfo};

/// Fetch phase of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No fetch in flight
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
}

/// An event driving the state machine
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A page was explicitly requested (refresh requests page 1)
    PageRequested {
        /// Page number to fetch, 1-based
        page: u32,
    },
    /// The consumer scrolled to the last rendered item
    EndReached,
    /// A fetch completed successfully
    FetchResolved {
        /// Id the fetch was dispatched with
        request_id: u64,
        /// The fetched page
        page: Page,
    },
    /// A fetch failed
    FetchFailed {
        /// Id the fetch was dispatched with
        request_id: u64,
    },
}

/// A side effect requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish the current render snapshot to observers
    Publish,
    /// Dispatch a fetch for `page`, tagged with `request_id`
    Fetch {
        /// Page number to fetch
        page: u32,
        /// Id to tag the completion with
        request_id: u64,
    },
}

impl Effect {
    /// Check if this is a publish effect
    pub fn is_publish(&self) -> bool {
        matches!(self, Self::Publish)
    }

    /// Check if this is a fetch effect
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// The feed's complete state
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    phase: Phase,
    pagination: Option<PageInfo>,
    items: Vec<FeedItem>,
    latest_request: u64,
    next_request: u64,
}

impl FeedState {
    /// Create an empty feed state
    pub fn new() -> Self {
        Self {
            next_request: 1,
            ..Self::default()
        }
    }

    /// Current fetch phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Metadata of the most recently applied page, if any fetch completed
    pub fn pagination(&self) -> Option<PageInfo> {
        self.pagination
    }

    /// The accumulated items
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// The render-ready list: items plus the trailing loading marker
    pub fn snapshot(&self) -> Vec<RenderEntry> {
        render_list(&self.items, self.is_loading())
    }

    /// Apply one event, returning the effects to carry out
    pub fn apply(&mut self, event: FeedEvent) -> Vec<Effect> {
        match event {
            FeedEvent::PageRequested { page } => self.start_fetch(page),

            FeedEvent::EndReached => {
                if self.is_loading() {
                    return Vec::new();
                }
                // Before the first fetch completes there is nothing to extend
                let Some(info) = self.pagination else {
                    return Vec::new();
                };
                if info.is_last_page() {
                    return Vec::new();
                }
                self.start_fetch(info.page + 1)
            }

            FeedEvent::FetchResolved { request_id, page } => {
                if request_id != self.latest_request {
                    return Vec::new();
                }
                self.phase = Phase::Idle;
                if page.pagination.page == 1 {
                    self.items = page.records;
                } else {
                    self.items.extend(page.records);
                }
                self.pagination = Some(page.pagination);
                vec![Effect::Publish]
            }

            FeedEvent::FetchFailed { request_id } => {
                if request_id != self.latest_request {
                    return Vec::new();
                }
                self.phase = Phase::Idle;
                vec![Effect::Publish]
            }
        }
    }

    fn start_fetch(&mut self, page: u32) -> Vec<Effect> {
        let request_id = self.next_request;
        self.next_request += 1;
        self.latest_request = request_id;
        self.phase = Phase::Loading;
        vec![Effect::Publish, Effect::Fetch { page, request_id }]
    }
}
