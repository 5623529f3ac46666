//! The TEST source: a mock scraper for exercising dispatch, bounds and
//! error paths end-to-end without talking to a marketplace.

use crate::consumer::ItemConsumer;
use crate::error::{Result, ScanError};
use crate::source::SourceScraper;
use async_trait::async_trait;
use bazaar_core::{ItemPayload, ScrapedItem};

/// Mock scraper registered under the `TEST` source identifier.
pub struct TestScraper {
    consumer: ItemConsumer,
}

impl TestScraper {
    /// Create a mock scraper over the invocation's consumer.
    #[must_use]
    pub fn new(consumer: ItemConsumer) -> Self {
        Self { consumer }
    }
}

#[async_trait]
impl SourceScraper for TestScraper {
    async fn scan(&mut self) -> Result<()> {
        tracing::info!("TEST: mock scanning source");
        Ok(())
    }

    /// Simulate scraping a url. Marker substrings in the url trigger the
    /// corresponding failure, for driving error paths from callers.
    async fn scrape(
        &mut self,
        native_url: &str,
        _scraper_data: Option<&serde_json::Value>,
    ) -> Result<ScrapedItem> {
        tracing::info!(%native_url, "TEST: mock scraping url");

        if native_url.contains("error") {
            return Err(ScanError::Internal(
                "test source raising a fatal error".to_string(),
            ));
        }
        if native_url.contains("cannotget") {
            return Err(ScanError::CannotGetUrl(native_url.to_string()));
        }

        let item = ScrapedItem {
            native_url: native_url.to_string(),
            is_complete: true,
            payload: ItemPayload {
                title: Some("test item".to_string()),
                has_ended: false,
                ..ItemPayload::default()
            },
        };
        self.consumer.process(item).await?.into_item()
    }

    fn consumer(&self) -> &ItemConsumer {
        &self.consumer
    }

    fn consumer_mut(&mut self) -> &mut ItemConsumer {
        &mut self.consumer
    }

    async fn shutdown(&mut self) {}
}
