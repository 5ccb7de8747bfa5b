//! Mock feed API server
//!
//! Serves a generated dataset the way a real paged backend would:
//! `GET /items?page=N` returns one page of the wire format. Useful for
//! demoing `scroll` against real HTTP and for manual client testing.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::fetch::{paginate, sample_items};
use crate::types::FeedItem;

/// Mock server configuration
#[derive(Debug, Clone)]
pub struct MockServerConfig {
    /// Items in the generated dataset
    pub items: u32,
    /// Items per page
    pub per_page: u32,
    /// Artificial latency before each response
    pub latency: Duration,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            items: 22,
            per_page: 10,
            latency: Duration::ZERO,
        }
    }
}

/// App state shared across handlers
struct AppState {
    items: Vec<FeedItem>,
    per_page: u32,
    latency: Duration,
}

/// Query parameters of the items endpoint
#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

/// Start the mock feed API server
pub async fn serve(config: MockServerConfig, port: u16) -> Result<()> {
    let state = AppState {
        items: sample_items(config.items),
        per_page: config.per_page,
        latency: config.latency,
    };

    // Allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/items", get(list_items))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(
        "Serving mock feed API on http://{} ({} items, {} per page)",
        addr,
        config.items,
        config.per_page
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// One page of the dataset
async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    if !state.latency.is_zero() {
        tokio::time::sleep(state.latency).await;
    }

    let page = paginate(&state.items, query.page, state.per_page);
    tracing::debug!(
        page = query.page,
        records = page.records.len(),
        "serving page"
    );

    Json(page)
}
