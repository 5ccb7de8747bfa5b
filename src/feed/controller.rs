//! Feed controller
//!
//! Binds the state machine to a page fetcher. Gesture calls apply an event,
//! publish a snapshot, and dispatch any resulting fetch as a spawned task;
//! they never block on the network. Fetch errors stop at this boundary: they
//! are logged and cleared, never returned to the gesture caller.

use super::state::{Effect, FeedEvent, FeedState};
use crate::fetch::PageFetcher;
use crate::render::RenderEntry;
use crate::types::{FeedItem, PageInfo};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

struct Inner {
    fetcher: Arc<dyn PageFetcher>,
    state: Mutex<FeedState>,
    snapshots: watch::Sender<Vec<RenderEntry>>,
}

impl Inner {
    /// Apply one event under the state lock, publishing if the machine asks
    async fn apply(&self, event: FeedEvent) -> Vec<Effect> {
        let mut state = self.state.lock().await;
        let effects = state.apply(event);
        if effects.iter().any(Effect::is_publish) {
            self.snapshots.send_replace(state.snapshot());
        }
        effects
    }
}

/// Controller for an endless-scrolling feed
///
/// Cheap to clone; clones share the same state and subscriber channel.
#[derive(Clone)]
pub struct FeedController {
    inner: Arc<Inner>,
}

impl FeedController {
    /// Create a controller over a fetcher
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        let state = FeedState::new();
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            inner: Arc::new(Inner {
                fetcher,
                state: Mutex::new(state),
                snapshots,
            }),
        }
    }

    /// Subscribe to render snapshots
    ///
    /// A new snapshot is published on every fetch start and every fetch
    /// completion. The receiver always holds the latest list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RenderEntry>> {
        self.inner.snapshots.subscribe()
    }

    /// Request page `page`
    ///
    /// Marks the feed loading, publishes the current items with an active
    /// marker, and dispatches the fetch without blocking on it. Calls are
    /// not deduplicated; the newest request wins.
    pub async fn request_page(&self, page: u32) {
        self.dispatch(FeedEvent::PageRequested { page }).await;
    }

    /// Pull-to-refresh: unconditionally request page 1
    pub async fn on_refresh(&self) {
        self.request_page(1).await;
    }

    /// The consumer scrolled to the last rendered item
    ///
    /// Requests the next page unless a fetch is in flight, the last page was
    /// reached, or no fetch has completed yet.
    pub async fn on_reached_end(&self) {
        self.dispatch(FeedEvent::EndReached).await;
    }

    /// Metadata of the most recently applied page
    pub async fn pagination(&self) -> Option<PageInfo> {
        self.inner.state.lock().await.pagination()
    }

    /// The accumulated items
    pub async fn items(&self) -> Vec<FeedItem> {
        self.inner.state.lock().await.items().to_vec()
    }

    /// Whether a fetch is in flight
    pub async fn is_loading(&self) -> bool {
        self.inner.state.lock().await.is_loading()
    }

    /// The current render-ready list
    pub async fn snapshot(&self) -> Vec<RenderEntry> {
        self.inner.state.lock().await.snapshot()
    }

    async fn dispatch(&self, event: FeedEvent) {
        let effects = self.inner.apply(event).await;
        for effect in effects {
            if let Effect::Fetch { page, request_id } = effect {
                self.spawn_fetch(page, request_id);
            }
        }
    }

    fn spawn_fetch(&self, page: u32, request_id: u64) {
        debug!(page, request_id, "dispatching page fetch");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let event = match inner.fetcher.fetch_page(page).await {
                Ok(payload) => FeedEvent::FetchResolved {
                    request_id,
                    page: payload,
                },
                Err(error) => {
                    // Controller boundary: failures are logged, not propagated
                    warn!(page, request_id, %error, "page fetch failed");
                    FeedEvent::FetchFailed { request_id }
                }
            };
            // Completion events never fan out into new fetches
            inner.apply(event).await;
        });
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("subscribers", &self.inner.snapshots.receiver_count())
            .finish_non_exhaustive()
    }
}
