//! Invocation API for scans and scrapes.
//!
//! Synchronous invocations accumulate in memory and return the whole
//! result; asynchronous ones are dispatched as independent fire-and-forget
//! background tasks that flush downstream, and return an empty envelope
//! echoing the effective bounds immediately. Background faults are
//! reported and never retried.

use crate::error::{Result, ScanError};
use crate::registry::ScraperRegistry;
use crate::source::{run_scan, run_scrape};
use bazaar_core::{ScanBounds, ScrapedItem, SourceId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters of a scan invocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    /// Upper publish-time bound; defaults to now
    pub epoch_youngest: Option<i64>,
    /// Lower publish-time bound; defaults to now minus one day
    pub epoch_oldest: Option<i64>,
    /// Maximum number of accepted items
    pub limit_count: Option<u32>,
    /// Wall-clock budget in seconds
    pub limit_seconds: Option<u64>,
    /// Return buffered items directly instead of dispatching in background
    #[serde(default)]
    pub synchronous: bool,
    /// Replay-mode HTML consumed by the first fetch
    pub pre_loaded_html: Option<String>,
}

/// Parameters of a scrape invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    /// URL of the listing to resolve
    pub native_url: String,
    /// Opaque per-source hint
    pub scraper_data: Option<serde_json::Value>,
    /// Return buffered items directly instead of dispatching in background
    #[serde(default)]
    pub synchronous: bool,
    /// Replay-mode HTML consumed by the first fetch
    pub pre_loaded_html: Option<String>,
}

/// Result envelope of a scan or scrape invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedObjects {
    /// Source the invocation ran against
    pub source: SourceId,
    /// Effective upper publish-time bound (scans only)
    pub epoch_youngest: Option<i64>,
    /// Effective lower publish-time bound (scans only)
    pub epoch_oldest: Option<i64>,
    /// Harvested items; empty for asynchronous invocations
    pub objects: Vec<ScrapedItem>,
}

/// Scan a source within bounds.
///
/// Applies the default window (now back to now minus one day) for unset
/// epochs and validates the resulting bounds before doing anything else.
pub async fn scan_source(
    registry: &Arc<ScraperRegistry>,
    source: &str,
    request: ScanRequest,
) -> Result<ScrapedObjects> {
    let source = SourceId::new(source).map_err(|e| ScanError::InvalidParameter(e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    let bounds = ScanBounds {
        epoch_youngest: request.epoch_youngest.or(Some(now)),
        epoch_oldest: request.epoch_oldest.or(Some(now - 86_400)),
        limit_count: request.limit_count,
        limit_seconds: request.limit_seconds,
    };
    bounds
        .validate()
        .map_err(|e| ScanError::InvalidParameter(e.to_string()))?;

    tracing::debug!(%source, ?bounds, synchronous = request.synchronous, "scan requested");

    if request.synchronous {
        let mut scraper = registry
            .create(&source, bounds, request.pre_loaded_html, false)
            .await?;
        let result = run_scan(scraper.as_mut()).await;
        scraper.shutdown().await;
        result?;

        return Ok(ScrapedObjects {
            source,
            epoch_youngest: bounds.epoch_youngest,
            epoch_oldest: bounds.epoch_oldest,
            objects: scraper.consumer().buffered().to_vec(),
        });
    }

    let mut scraper = registry
        .create(&source, bounds, request.pre_loaded_html, true)
        .await?;
    let reporter = registry.reporter();
    let task_source = source.clone();
    tokio::spawn(async move {
        let result = run_scan(scraper.as_mut()).await;
        scraper.shutdown().await;
        if let Err(e) = result {
            tracing::error!(source = %task_source, error = %e, "background scan failed");
            reporter.error(&format!("{task_source} SCAN FAILED"), &e.to_string());
        }
    });

    Ok(ScrapedObjects {
        source,
        epoch_youngest: bounds.epoch_youngest,
        epoch_oldest: bounds.epoch_oldest,
        objects: Vec::new(),
    })
}

/// Resolve one listing url through a source's scraper.
pub async fn scrape_source(
    registry: &Arc<ScraperRegistry>,
    source: &str,
    request: ScrapeRequest,
) -> Result<ScrapedObjects> {
    let source = SourceId::new(source).map_err(|e| ScanError::InvalidParameter(e.to_string()))?;
    if request.native_url.trim().is_empty() {
        return Err(ScanError::InvalidParameter(
            "native_url must be set".to_string(),
        ));
    }

    tracing::debug!(%source, url = %request.native_url, synchronous = request.synchronous, "scrape requested");

    if request.synchronous {
        let mut scraper = registry
            .create(&source, ScanBounds::default(), request.pre_loaded_html, false)
            .await?;
        let result = run_scrape(
            scraper.as_mut(),
            &request.native_url,
            request.scraper_data.as_ref(),
        )
        .await;
        scraper.shutdown().await;
        result?;

        return Ok(ScrapedObjects {
            source,
            epoch_youngest: None,
            epoch_oldest: None,
            objects: scraper.consumer().buffered().to_vec(),
        });
    }

    let mut scraper = registry
        .create(&source, ScanBounds::default(), request.pre_loaded_html, true)
        .await?;
    let reporter = registry.reporter();
    let task_source = source.clone();
    let native_url = request.native_url;
    let scraper_data = request.scraper_data;
    tokio::spawn(async move {
        let result = run_scrape(scraper.as_mut(), &native_url, scraper_data.as_ref()).await;
        scraper.shutdown().await;
        if let Err(e) = result {
            tracing::error!(source = %task_source, url = %native_url, error = %e, "background scrape failed");
            reporter.error(&format!("{task_source} SCRAPE FAILED"), &e.to_string());
        }
    });

    Ok(ScrapedObjects {
        source,
        epoch_youngest: None,
        epoch_oldest: None,
        objects: Vec::new(),
    })
}
