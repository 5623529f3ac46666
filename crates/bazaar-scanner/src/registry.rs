//! Strategy dispatch from a source identifier to its scraper.

use crate::consumer::ItemConsumer;
use crate::error::{Result, ScanError};
use crate::report::{LogReporter, Reporter};
use crate::sink::ItemSink;
use crate::source::SourceScraper;
use crate::sources::{TestScraper, TraderaScraper};
use bazaar_browser::{FetchEngine, LocalDriver, RemoteRenderer, RenderingStrategy};
use bazaar_core::{RendererConfig, RendererMode, ScanBounds, SourceId};
use std::sync::Arc;

/// Builds properly wired scrapers for known sources.
///
/// Holds the process-level collaborators (rendering settings, sink,
/// reporter); every created scraper gets its own consumer and its own
/// exclusively owned rendering transport.
pub struct ScraperRegistry {
    renderer: RendererConfig,
    sink: Option<Arc<dyn ItemSink>>,
    reporter: Arc<dyn Reporter>,
}

impl ScraperRegistry {
    /// Create a registry over resolved rendering settings.
    #[must_use]
    pub fn new(renderer: RendererConfig) -> Self {
        Self {
            renderer,
            sink: None,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Deliver flushed batches to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ItemSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Report through `reporter` instead of plain logging.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The registry's reporter, shared with background invocations.
    #[must_use]
    pub fn reporter(&self) -> Arc<dyn Reporter> {
        self.reporter.clone()
    }

    /// Create a scraper for `source`, wired for one invocation.
    ///
    /// `allow_flush = false` keeps the consumer purely in-memory for
    /// synchronous callers. Unknown sources fail before any rendering
    /// transport is constructed.
    ///
    /// # Errors
    /// Returns [`ScanError::UnknownSource`] for unregistered identifiers,
    /// or a fetch error if a local browser was configured but cannot start.
    pub async fn create(
        &self,
        source: &SourceId,
        bounds: ScanBounds,
        pre_loaded_html: Option<String>,
        allow_flush: bool,
    ) -> Result<Box<dyn SourceScraper>> {
        let sink = if allow_flush { self.sink.clone() } else { None };
        let consumer = ItemConsumer::new(source.clone(), bounds, sink, self.reporter.clone());

        match source.as_str() {
            "TRADERA" => {
                let engine = self.build_engine(pre_loaded_html).await?;
                Ok(Box::new(TraderaScraper::new(
                    Box::new(engine),
                    consumer,
                    self.reporter.clone(),
                )))
            }
            "TEST" => Ok(Box::new(TestScraper::new(consumer))),
            other => Err(ScanError::UnknownSource(other.to_string())),
        }
    }

    async fn build_engine(&self, pre_loaded_html: Option<String>) -> Result<FetchEngine> {
        let strategy = match self.renderer.mode {
            RendererMode::Local => RenderingStrategy::Local(LocalDriver::launch().await?),
            RendererMode::Remote => RenderingStrategy::Remote(RemoteRenderer::new(
                &self.renderer.remote_endpoint,
                &self.renderer.remote_token,
            )),
        };

        let mut engine = FetchEngine::new(strategy);
        if let Some(html) = pre_loaded_html {
            engine = engine.with_preloaded(html);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ScraperRegistry {
        ScraperRegistry::new(RendererConfig::default())
    }

    #[tokio::test]
    async fn test_unknown_source_fails_fast() {
        let source = SourceId::new("ebay").expect("valid source id");
        let err = match registry()
            .create(&source, ScanBounds::default(), None, false)
            .await
        {
            Ok(_) => panic!("unknown source"),
            Err(e) => e,
        };
        assert_eq!(err.code(), "UNKNOWN_SOURCE_ERROR");
    }

    #[tokio::test]
    async fn test_known_sources_resolve_case_insensitively() {
        let registry = registry();
        for name in ["tradera", "TRADERA", "Test"] {
            let source = SourceId::new(name).expect("valid source id");
            assert!(
                registry
                    .create(&source, ScanBounds::default(), None, false)
                    .await
                    .is_ok(),
                "source {name} should resolve"
            );
        }
    }
}
