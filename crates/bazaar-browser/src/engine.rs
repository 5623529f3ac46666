//! The fetch-retry-and-fallback engine.
//!
//! One engine owns one rendering transport for its whole lifetime: either
//! a locally driven headless Chromium, or a remote rendering service that
//! is POSTed the target url and replies with rendered HTML. Retry policy
//! and the pre-loaded replay mode live here; site-specific parsing does
//! not.

use crate::error::{FetchError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use scraper::Html;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Total fetch attempts per url.
const FETCH_ATTEMPTS: u32 = 4;

/// Default sleep between transient failures.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on waiting for a wait condition to be satisfied.
const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for a wait condition.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How a page's HTML was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    /// Rendered by the locally driven browser
    LocalDriver,
    /// Rendered by the remote rendering service
    RemoteRenderer,
    /// Taken from the pre-loaded HTML blob (replay mode)
    Preloaded,
}

/// "Element present" condition applied before reading the rendered DOM.
#[derive(Debug, Clone)]
pub struct WaitCondition {
    /// CSS selector that must match before the DOM is read
    pub selector: String,
}

impl WaitCondition {
    /// Wait until an element matching `selector` is present.
    #[must_use]
    pub fn element_present(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

/// Something that can fetch a url and hold on to the fetched page.
///
/// The production implementation is [`FetchEngine`]; tests drive the
/// orchestrators with scripted implementations instead.
#[async_trait]
pub trait PageFetcher: Send {
    /// Fetch a url, retrying per the engine's policy.
    ///
    /// `Ok(true)` means a page is held and [`html`](Self::html) returns it;
    /// `Ok(false)` means the transport could not obtain HTML within its
    /// attempt budget. Callers decide whether that is fatal.
    async fn fetch(&mut self, url: &str, wait: Option<&WaitCondition>) -> Result<bool>;

    /// Raw HTML of the last successful fetch.
    fn html(&self) -> Option<&str>;

    /// Release any held rendering resources.
    async fn shutdown(&mut self) {}
}

/// Resolved rendering capability, injected at construction time.
///
/// The caller decides once, from its environment, whether a local browser
/// is available; nothing in this crate probes or mutates process-wide
/// state.
pub enum RenderingStrategy {
    /// Drive a locally installed headless Chromium
    Local(LocalDriver),
    /// POST target urls to a remote rendering service
    Remote(RemoteRenderer),
}

/// A locally driven headless Chromium instance.
///
/// Exclusively owned by one engine; [`close`](Self::close) releases the
/// browser process.
pub struct LocalDriver {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl LocalDriver {
    /// Launch a headless browser.
    ///
    /// # Errors
    /// Returns [`FetchError::Driver`] if Chromium cannot be started.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1420, 1080)
            .build()
            .map_err(FetchError::Driver)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Driver(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Navigate to `url`, optionally wait for an element, and read the
    /// rendered DOM.
    async fn render(&self, url: &str, wait: Option<&WaitCondition>) -> Result<String> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if let Some(condition) = wait {
            let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
            loop {
                if page.find_element(condition.selector.as_str()).await.is_ok() {
                    break;
                }
                if tokio::time::Instant::now() >= deadline {
                    tracing::warn!(
                        selector = %condition.selector,
                        "wait condition not met within {:?}, reading DOM anyway",
                        WAIT_TIMEOUT
                    );
                    break;
                }
                tokio::time::sleep(WAIT_POLL_INTERVAL).await;
            }
        }

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::Driver(e.to_string()))?;

        if let Err(e) = page.close().await {
            tracing::debug!("failed to close page: {e}");
        }

        Ok(html)
    }

    /// Close the browser and stop its event handler.
    pub async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("failed to close browser: {e}");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

/// Client for a remote rendering service.
///
/// The service accepts `POST {endpoint}/content?token=...` with a JSON
/// body naming the target url, and replies with the rendered HTML.
pub struct RemoteRenderer {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl RemoteRenderer {
    /// Create a client for the rendering service at `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    fn content_url(&self) -> String {
        format!(
            "{}/content?token={}",
            self.endpoint.trim_end_matches('/'),
            self.token
        )
    }

    /// Render one url. `Ok(None)` signals a bad-gateway reply, which the
    /// engine treats as transient.
    async fn render(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(self.content_url())
            .header("Cache-Control", "no-cache")
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if response.status() == reqwest::StatusCode::BAD_GATEWAY {
            return Ok(None);
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        tracing::debug!(bytes = html.len(), "remote renderer replied");
        Ok(Some(html))
    }
}

/// Fetches rendered pages with retry, and stores the last page for
/// structural queries by the caller's parser.
pub struct FetchEngine {
    strategy: RenderingStrategy,
    retry_delay: Duration,
    preloaded: Option<String>,
    html: Option<String>,
    via: Option<Via>,
}

impl FetchEngine {
    /// Create an engine over a resolved rendering strategy.
    #[must_use]
    pub fn new(strategy: RenderingStrategy) -> Self {
        Self {
            strategy,
            retry_delay: RETRY_DELAY,
            preloaded: None,
            html: None,
            via: None,
        }
    }

    /// Pre-load an HTML blob to be consumed by the first fetch.
    ///
    /// Replay mode: the first `fetch` after construction returns this blob
    /// without touching the network; later fetches go live.
    #[must_use]
    pub fn with_preloaded(mut self, html: impl Into<String>) -> Self {
        self.preloaded = Some(html.into());
        self
    }

    /// Override the sleep between transient failures.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// How the last page was obtained.
    #[must_use]
    pub fn via(&self) -> Option<Via> {
        self.via
    }

    /// Parse the last fetched page for structural queries.
    ///
    /// The document is parsed on demand and must not be held across await
    /// points; extract owned data from it before the next fetch.
    #[must_use]
    pub fn document(&self) -> Option<Html> {
        self.html.as_ref().map(|h| Html::parse_document(h))
    }
}

#[async_trait]
impl PageFetcher for FetchEngine {
    async fn fetch(&mut self, url: &str, wait: Option<&WaitCondition>) -> Result<bool> {
        self.html = None;
        self.via = None;

        if let Some(preset) = self.preloaded.take() {
            tracing::debug!(bytes = preset.len(), "using pre-loaded html");
            self.html = Some(preset);
            self.via = Some(Via::Preloaded);
            return Ok(true);
        }

        tracing::debug!(%url, "fetching url");

        let mut remaining = FETCH_ATTEMPTS;
        while self.html.is_none() && remaining > 0 {
            remaining -= 1;

            match &self.strategy {
                RenderingStrategy::Local(driver) => match driver.render(url, wait).await {
                    Ok(html) => {
                        self.html = Some(html);
                        self.via = Some(Via::LocalDriver);
                    }
                    Err(e) if e.is_transient() && remaining > 0 => {
                        tracing::warn!(
                            error = %e,
                            delay = ?self.retry_delay,
                            "transient fetch failure, sleeping and retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    // Last attempt: a local connection failure is a hard
                    // error, unlike remote exhaustion below.
                    Err(e) => return Err(e),
                },
                RenderingStrategy::Remote(renderer) => match renderer.render(url).await {
                    Ok(Some(html)) => {
                        self.html = Some(html);
                        self.via = Some(Via::RemoteRenderer);
                    }
                    Ok(None) => {
                        if remaining > 0 {
                            tracing::debug!(
                                delay = ?self.retry_delay,
                                "remote renderer replied bad gateway, sleeping and retrying"
                            );
                            tokio::time::sleep(self.retry_delay).await;
                        }
                    }
                    Err(e) if e.is_transient() && remaining > 0 => {
                        tracing::warn!(
                            error = %e,
                            delay = ?self.retry_delay,
                            "transient fetch failure, sleeping and retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    Err(e) if e.is_transient() => {
                        // Remote exhaustion is reported as "no html", not
                        // as a raised error.
                        tracing::warn!(error = %e, "remote renderer exhausted its attempts");
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        if self.html.is_none() {
            tracing::debug!(%url, "failed to get html");
        }

        Ok(self.html.is_some())
    }

    fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    async fn shutdown(&mut self) {
        if let RenderingStrategy::Local(driver) = &mut self.strategy {
            driver.close().await;
        }
    }
}
