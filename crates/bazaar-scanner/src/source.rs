//! The per-source orchestrator contract.
//!
//! One implementing type per marketplace, selected through the registry.
//! Shared fetch and text-normalization logic is composed in (an owned
//! [`PageFetcher`]), not inherited.

use crate::consumer::ItemConsumer;
use crate::error::{Result, ScanError};
use async_trait::async_trait;
use bazaar_browser::{PageFetcher, WaitCondition};
use bazaar_core::ScrapedItem;

/// A per-source orchestrator: walks listings for scans, resolves single
/// listings for scrapes.
///
/// One instance serves one invocation and exclusively owns its consumer
/// and rendering transport.
#[async_trait]
pub trait SourceScraper: Send {
    /// Walk the source's paginated category listings newest-first, feeding
    /// candidates through the consumer until pagination ends or a bound
    /// stops the walk. Consumer stop decisions are handled internally;
    /// only real faults come back as errors.
    async fn scan(&mut self) -> Result<()>;

    /// Resolve one listing url into a complete item, through the same
    /// consumer (so bounds and buffering apply uniformly).
    async fn scrape(
        &mut self,
        native_url: &str,
        scraper_data: Option<&serde_json::Value>,
    ) -> Result<ScrapedItem>;

    /// This invocation's consumer.
    fn consumer(&self) -> &ItemConsumer;

    /// This invocation's consumer, mutably.
    fn consumer_mut(&mut self) -> &mut ItemConsumer;

    /// Release rendering resources held by this scraper.
    async fn shutdown(&mut self);
}

/// Run a full scan, then deliver whatever remains below the auto-flush
/// threshold. The flush runs exactly once, after the scan completed
/// normally or stopped on a consumer bound; a fatal fault skips it.
pub async fn run_scan(scraper: &mut dyn SourceScraper) -> Result<()> {
    scraper.scan().await?;
    scraper.consumer_mut().flush().await
}

/// Run a single scrape, then flush.
pub async fn run_scrape(
    scraper: &mut dyn SourceScraper,
    native_url: &str,
    scraper_data: Option<&serde_json::Value>,
) -> Result<ScrapedItem> {
    let item = scraper.scrape(native_url, scraper_data).await?;
    scraper.consumer_mut().flush().await?;
    Ok(item)
}

/// Fetch a url through the transport, promoting exhaustion to
/// [`ScanError::CannotGetUrl`], and hand back the page HTML.
pub(crate) async fn fetch_page(
    fetcher: &mut dyn PageFetcher,
    url: &str,
    wait: &WaitCondition,
) -> Result<String> {
    let fetched = fetcher.fetch(url, Some(wait)).await?;
    if !fetched {
        return Err(ScanError::CannotGetUrl(url.to_string()));
    }
    fetcher
        .html()
        .map(str::to_owned)
        .ok_or_else(|| ScanError::Internal("transport reported success without a page".to_string()))
}
