//! Feed controller module
//!
//! Owns the accumulated item list and the current pagination metadata, and
//! decides when to reset, append, or stop fetching.
//!
//! # Overview
//!
//! The logic is split in two:
//! - [`FeedState`] is an explicit state machine: a pure update function maps
//!   events (page requested, end reached, fetch resolved, fetch failed) to a
//!   new state plus pending effects
//! - [`FeedController`] binds the machine to a [`PageFetcher`], dispatches
//!   fetch effects as tasks, and publishes render snapshots to subscribers
//!
//! Every dispatched fetch carries a monotonically increasing request id; a
//! completion whose id is no longer the latest is dropped without touching
//! state, so a slow stale response can never overwrite a newer refresh.
//!
//! [`PageFetcher`]: crate::fetch::PageFetcher

mod controller;
mod state;

pub use controller::FeedController;
pub use state::{Effect, FeedEvent, FeedState, Phase};

#[cfg(test)]
mod tests;
