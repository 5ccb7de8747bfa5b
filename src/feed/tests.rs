//! Tests for the feed module

use super::*;
use crate::error::{Error, Result};
use crate::fetch::{paginate, sample_items, PageFetcher, StaticPageFetcher};
use crate::render::{self, RenderEntry};
use crate::types::{Page, PageInfo};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

/// One page of a generated dataset, in the wire shape
fn page_payload(page: u32, per_page: u32, total: u32) -> Page {
    paginate(&sample_items(total), page, per_page)
}

fn fetch_effect(effects: &[Effect]) -> Option<(u32, u64)> {
    effects.iter().find_map(|e| match e {
        Effect::Fetch { page, request_id } => Some((*page, *request_id)),
        Effect::Publish => None,
    })
}

fn titles(items: &[crate::types::FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

// ============================================================================
// State Machine Tests
// ============================================================================

#[test]
fn test_state_initial() {
    let state = FeedState::new();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.is_loading());
    assert!(state.pagination().is_none());
    assert!(state.items().is_empty());
}

#[test]
fn test_page_requested_starts_fetch_and_publishes() {
    let mut state = FeedState::new();
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });

    assert!(state.is_loading());
    assert!(effects.iter().any(Effect::is_publish));
    assert_eq!(fetch_effect(&effects), Some((1, 1)));
}

#[test]
fn test_page_one_replaces_items() {
    let mut state = FeedState::new();

    // Pre-load some items via a full request/resolve round
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });
    let (_, id) = fetch_effect(&effects).unwrap();
    state.apply(FeedEvent::FetchResolved {
        request_id: id,
        page: page_payload(1, 3, 9),
    });
    assert_eq!(state.items().len(), 3);

    // A later page-1 result resets, it does not append
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });
    let (_, id) = fetch_effect(&effects).unwrap();
    let effects = state.apply(FeedEvent::FetchResolved {
        request_id: id,
        page: page_payload(1, 3, 9),
    });

    assert_eq!(effects, vec![Effect::Publish]);
    assert_eq!(state.items().len(), 3);
    assert_eq!(titles(state.items()), ["Item 1", "Item 2", "Item 3"]);
    assert!(!state.is_loading());
}

#[test]
fn test_later_pages_append_in_order() {
    let mut state = FeedState::new();

    for expected_page in 1..=2u32 {
        let effects = state.apply(FeedEvent::PageRequested {
            page: expected_page,
        });
        let (page, id) = fetch_effect(&effects).unwrap();
        assert_eq!(page, expected_page);
        state.apply(FeedEvent::FetchResolved {
            request_id: id,
            page: page_payload(page, 3, 9),
        });
    }

    assert_eq!(
        titles(state.items()),
        ["Item 1", "Item 2", "Item 3", "Item 4", "Item 5", "Item 6"]
    );
    assert_eq!(state.pagination().unwrap().page, 2);
}

#[test]
fn test_end_reached_requests_next_page() {
    let mut state = FeedState::new();
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });
    let (_, id) = fetch_effect(&effects).unwrap();
    state.apply(FeedEvent::FetchResolved {
        request_id: id,
        page: page_payload(1, 10, 22),
    });

    let effects = state.apply(FeedEvent::EndReached);
    assert_eq!(fetch_effect(&effects).map(|(page, _)| page), Some(2));
}

#[test]
fn test_end_reached_noop_while_loading() {
    let mut state = FeedState::new();
    state.apply(FeedEvent::PageRequested { page: 1 });

    let effects = state.apply(FeedEvent::EndReached);
    assert!(effects.is_empty());
}

#[test]
fn test_end_reached_noop_before_first_fetch() {
    let mut state = FeedState::new();

    let effects = state.apply(FeedEvent::EndReached);
    assert!(effects.is_empty());
    assert!(!state.is_loading());
}

#[test]
fn test_end_reached_noop_on_last_page() {
    let mut state = FeedState::new();
    let effects = state.apply(FeedEvent::PageRequested { page: 3 });
    let (_, id) = fetch_effect(&effects).unwrap();
    state.apply(FeedEvent::FetchResolved {
        request_id: id,
        // 22 <= (3-1)*10 + 2
        page: page_payload(3, 10, 22),
    });

    let effects = state.apply(FeedEvent::EndReached);
    assert!(effects.is_empty());
}

#[test]
fn test_failure_keeps_items_and_clears_loading() {
    let mut state = FeedState::new();
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });
    let (_, id) = fetch_effect(&effects).unwrap();
    state.apply(FeedEvent::FetchResolved {
        request_id: id,
        page: page_payload(1, 10, 22),
    });
    let before = state.items().to_vec();

    let effects = state.apply(FeedEvent::EndReached);
    let (_, id) = fetch_effect(&effects).unwrap();
    let effects = state.apply(FeedEvent::FetchFailed { request_id: id });

    assert_eq!(effects, vec![Effect::Publish]);
    assert!(!state.is_loading());
    assert_eq!(state.items(), &before[..]);
    assert_eq!(state.pagination().unwrap().page, 1);
}

#[test]
fn test_stale_resolution_is_dropped() {
    let mut state = FeedState::new();

    // Page 2 goes out, then a refresh supersedes it
    let effects = state.apply(FeedEvent::PageRequested { page: 2 });
    let (_, stale_id) = fetch_effect(&effects).unwrap();
    let effects = state.apply(FeedEvent::PageRequested { page: 1 });
    let (_, fresh_id) = fetch_effect(&effects).unwrap();

    // The slow page-2 response lands first and must be inert
    let effects = state.apply(FeedEvent::FetchResolved {
        request_id: stale_id,
        page: page_payload(2, 10, 22),
    });
    assert!(effects.is_empty());
    assert!(state.items().is_empty());
    assert!(state.is_loading());

    // The fresh page-1 response applies normally
    state.apply(FeedEvent::FetchResolved {
        request_id: fresh_id,
        page: page_payload(1, 10, 22),
    });
    assert_eq!(state.items().len(), 10);
    assert_eq!(state.pagination().unwrap().page, 1);
    assert!(!state.is_loading());
}

#[test]
fn test_stale_failure_is_dropped() {
    let mut state = FeedState::new();

    let effects = state.apply(FeedEvent::PageRequested { page: 2 });
    let (_, stale_id) = fetch_effect(&effects).unwrap();
    state.apply(FeedEvent::PageRequested { page: 1 });

    // A stale failure must not clear the loading flag of the fresh fetch
    let effects = state.apply(FeedEvent::FetchFailed {
        request_id: stale_id,
    });
    assert!(effects.is_empty());
    assert!(state.is_loading());
}

#[test]
fn test_snapshot_marker_tracks_phase() {
    let mut state = FeedState::new();
    assert!(!render::marker_loading(&state.snapshot()));

    state.apply(FeedEvent::PageRequested { page: 1 });
    let snapshot = state.snapshot();
    assert!(render::marker_loading(&snapshot));
    assert_eq!(render::content_count(&snapshot), 0);
    assert_eq!(snapshot.len(), 1);
}

// ============================================================================
// Controller Test Support
// ============================================================================

/// Fetcher whose responses are held back until the test releases them
struct GatedFetcher {
    inner: StaticPageFetcher,
    gate: Semaphore,
    calls: AtomicU32,
}

impl GatedFetcher {
    fn new(count: u32, per_page: u32) -> Self {
        Self {
            inner: StaticPageFetcher::generated(count, per_page),
            gate: Semaphore::new(0),
            calls: AtomicU32::new(0),
        }
    }

    fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Fetches dispatched so far, including ones still waiting at the gate
    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Error::fetch("gate closed"))?;
        permit.forget();
        self.inner.fetch_page(page).await
    }
}

/// Wait until the marker goes idle, returning that snapshot
async fn wait_idle(rx: &mut watch::Receiver<Vec<RenderEntry>>) -> Vec<RenderEntry> {
    loop {
        {
            let snapshot = rx.borrow_and_update();
            if !render::marker_loading(&snapshot) {
                return snapshot.clone();
            }
        }
        rx.changed().await.expect("controller dropped");
    }
}

/// Let spawned fetch tasks run up to their next await point
async fn drain_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Controller Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_loads_first_page() {
    let fetcher = Arc::new(StaticPageFetcher::generated(22, 10));
    let controller = FeedController::new(fetcher.clone());
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    // Fetch start publishes the loading marker before any response
    assert!(render::marker_loading(&rx.borrow()));

    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);
    assert!(!render::marker_loading(&snapshot));
    assert_eq!(
        controller.pagination().await,
        Some(PageInfo::new(1, 10, 10, 22))
    );
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_scroll_to_exhaustion() {
    let fetcher = Arc::new(StaticPageFetcher::generated(22, 10));
    let controller = FeedController::new(fetcher.clone());
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);

    controller.on_reached_end().await;
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 20);

    controller.on_reached_end().await;
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 22);
    assert!(controller.pagination().await.unwrap().is_last_page());
    assert_eq!(fetcher.calls(), 3);

    // Past the last page the gesture is a no-op
    controller.on_reached_end().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 3);
    assert_eq!(controller.items().await.len(), 22);
}

#[tokio::test]
async fn test_items_accumulate_in_order() {
    let fetcher = Arc::new(StaticPageFetcher::generated(6, 3));
    let controller = FeedController::new(fetcher);
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    wait_idle(&mut rx).await;
    controller.on_reached_end().await;
    wait_idle(&mut rx).await;

    let items = controller.items().await;
    assert_eq!(
        titles(&items),
        ["Item 1", "Item 2", "Item 3", "Item 4", "Item 5", "Item 6"]
    );
}

#[tokio::test]
async fn test_end_reached_before_refresh_is_noop() {
    let fetcher = Arc::new(StaticPageFetcher::generated(22, 10));
    let controller = FeedController::new(fetcher.clone());

    controller.on_reached_end().await;
    drain_tasks().await;

    assert_eq!(fetcher.calls(), 0);
    assert!(!controller.is_loading().await);
}

#[tokio::test]
async fn test_end_reached_while_loading_is_noop() {
    let fetcher = Arc::new(GatedFetcher::new(22, 10));
    let controller = FeedController::new(fetcher.clone());
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 1);
    assert!(controller.is_loading().await);

    // The gesture fires again while page 1 is still in flight
    controller.on_reached_end().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 1);

    fetcher.release(1);
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);
}

#[tokio::test]
async fn test_failed_fetch_keeps_last_good_list() {
    let fetcher = Arc::new(StaticPageFetcher::generated(22, 10).failing_on(2));
    let controller = FeedController::new(fetcher.clone());
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    wait_idle(&mut rx).await;

    controller.on_reached_end().await;
    let snapshot = wait_idle(&mut rx).await;

    // Failure: loading cleared, list unchanged, metadata unchanged
    assert_eq!(render::content_count(&snapshot), 10);
    assert!(!render::marker_loading(&snapshot));
    assert_eq!(controller.pagination().await.unwrap().page, 1);

    // The next gesture is the retry path
    controller.on_reached_end().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_refresh_supersedes_inflight_fetch() {
    let fetcher = Arc::new(GatedFetcher::new(22, 10));
    let controller = FeedController::new(fetcher.clone());
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    fetcher.release(1);
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);

    // Page 2 goes out and stalls at the gate
    controller.on_reached_end().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 2);

    // Refresh while page 2 is in flight
    controller.on_refresh().await;
    drain_tasks().await;
    assert_eq!(fetcher.calls(), 3);

    // The stale page-2 response resolves first (the gate is FIFO) and must
    // not touch the list or clear the refresh's loading state
    fetcher.release(1);
    drain_tasks().await;
    assert_eq!(controller.items().await.len(), 10);
    assert!(controller.is_loading().await);

    // The refresh's page-1 response then lands normally
    fetcher.release(1);
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);
    assert_eq!(controller.pagination().await.unwrap().page, 1);
}

#[tokio::test]
async fn test_refresh_after_exhaustion_resets() {
    let fetcher = Arc::new(StaticPageFetcher::generated(22, 10));
    let controller = FeedController::new(fetcher);
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    wait_idle(&mut rx).await;
    controller.on_reached_end().await;
    wait_idle(&mut rx).await;
    controller.on_reached_end().await;
    wait_idle(&mut rx).await;
    assert_eq!(controller.items().await.len(), 22);

    controller.on_refresh().await;
    let snapshot = wait_idle(&mut rx).await;
    assert_eq!(render::content_count(&snapshot), 10);
    assert_eq!(controller.pagination().await.unwrap().page, 1);
}

#[tokio::test]
async fn test_snapshot_is_items_plus_marker() {
    let fetcher = Arc::new(StaticPageFetcher::generated(3, 10));
    let controller = FeedController::new(fetcher);
    let mut rx = controller.subscribe();

    controller.on_refresh().await;
    let snapshot = wait_idle(&mut rx).await;

    assert_eq!(snapshot.len(), 4);
    assert!(snapshot[..3].iter().all(RenderEntry::is_item));
    assert!(snapshot[3].is_loading_marker());
}
