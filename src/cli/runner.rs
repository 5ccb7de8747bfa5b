//! CLI command execution

use super::commands::{Cli, Commands};
use super::server::{self, MockServerConfig};
use crate::config::FeedConfig;
use crate::error::Result;
use crate::feed::FeedController;
use crate::fetch::{HttpPageFetcher, PageFetcher, StaticPageFetcher};
use crate::render::{self, RenderEntry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Runs CLI commands
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Scroll {
                config,
                url,
                max_pages,
                items,
                per_page,
            } => {
                let fetcher = build_fetcher(config.as_deref(), url.as_deref(), *items, *per_page)?;
                scroll(fetcher, *max_pages).await
            }

            Commands::MockServe {
                port,
                items,
                per_page,
                latency_ms,
            } => {
                let config = MockServerConfig {
                    items: *items,
                    per_page: *per_page,
                    latency: Duration::from_millis(*latency_ms),
                };
                server::serve(config, *port).await
            }

            Commands::Validate { config } => validate(config),
        }
    }
}

/// Pick the page source: config file, bare URL, or the built-in dataset
fn build_fetcher(
    config: Option<&Path>,
    url: Option<&str>,
    items: u32,
    per_page: u32,
) -> Result<Arc<dyn PageFetcher>> {
    if let Some(path) = config {
        let config = FeedConfig::from_yaml_file(path)?;
        info!(source = %config.source.base_url, "scrolling configured source");
        return Ok(Arc::new(HttpPageFetcher::new(config.fetcher_config())?));
    }

    if let Some(url) = url {
        info!(source = url, "scrolling remote feed");
        return Ok(Arc::new(HttpPageFetcher::for_base_url(url)?));
    }

    info!(items, per_page, "no source given, scrolling the built-in dataset");
    Ok(Arc::new(StaticPageFetcher::generated(items, per_page)))
}

/// Drive the feed to the last page, printing each new batch
async fn scroll(fetcher: Arc<dyn PageFetcher>, max_pages: u32) -> Result<()> {
    let controller = FeedController::new(fetcher);
    let mut snapshots = controller.subscribe();

    let mut shown = 0usize;
    let mut pages = 0u32;

    controller.on_refresh().await;
    loop {
        let snapshot = wait_idle(&mut snapshots).await;

        let Some(info) = controller.pagination().await else {
            warn!("initial fetch failed, nothing to show");
            break;
        };

        let total = render::content_count(&snapshot);
        if total == shown && pages > 0 {
            warn!("page fetch made no progress, stopping");
            break;
        }

        for entry in snapshot.iter().filter_map(RenderEntry::as_item).skip(shown) {
            shown += 1;
            println!("{shown:>4}  {}  {}", entry.title, entry.description);
        }
        pages += 1;

        if info.is_last_page() {
            info!("last page reached");
            break;
        }
        if max_pages > 0 && pages >= max_pages {
            info!(max_pages, "page limit reached");
            break;
        }

        controller.on_reached_end().await;
    }

    println!("Fetched {shown} items in {pages} pages.");
    Ok(())
}

/// Wait until the loading marker goes idle
async fn wait_idle(snapshots: &mut watch::Receiver<Vec<RenderEntry>>) -> Vec<RenderEntry> {
    loop {
        {
            let snapshot = snapshots.borrow_and_update();
            if !render::marker_loading(&snapshot) {
                return snapshot.clone();
            }
        }
        if snapshots.changed().await.is_err() {
            return Vec::new();
        }
    }
}

/// Validate a feed definition file
fn validate(path: &PathBuf) -> Result<()> {
    let config = FeedConfig::from_yaml_file(path)?;
    println!(
        "OK: {} ({} per page via '{}')",
        config.source.base_url, config.source.per_page, config.source.page_param
    );
    Ok(())
}
