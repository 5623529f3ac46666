//! The consumer: enforces scan bounds and buffers/flushes accepted items.
//!
//! One consumer lives for one scan or scrape invocation. It sees every
//! accepted candidate in discovery order (newest first for scans), decides
//! whether the invocation should stop, and owns the buffer of accepted
//! items until they are flushed downstream.

use crate::error::{Result, ScanError};
use crate::report::Reporter;
use crate::sink::ItemSink;
use bazaar_core::{ItemBatch, ScanBounds, ScrapedItem, SourceId};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Buffer size above which `process` flushes mid-scan.
const FLUSH_THRESHOLD: usize = 50;

/// Why the consumer asked its caller to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The wall-clock budget for the whole scan is spent
    TimeLimit {
        /// Configured budget in seconds
        limit_seconds: u64,
    },
    /// The accepted-item budget for the whole scan is spent
    CountLimit {
        /// Configured item budget
        limit_count: u32,
    },
    /// The current unit has aged past the cutoff
    PublishedTooOld {
        /// Publish time of the item that crossed the cutoff
        epoch_published: i64,
        /// Configured cutoff
        epoch_oldest: i64,
    },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeLimit { limit_seconds } => {
                write!(f, "the time limit of {limit_seconds} sec has passed")
            }
            Self::CountLimit { limit_count } => {
                write!(f, "the limit count of {limit_count} items has been reached")
            }
            Self::PublishedTooOld {
                epoch_published,
                epoch_oldest,
            } => write!(
                f,
                "parsed an item published at {epoch_published}, older than the cutoff {epoch_oldest}"
            ),
        }
    }
}

/// What `process` decided about one candidate.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The item was buffered; keep going
    Accepted(ScrapedItem),
    /// A whole-scan bound was hit; end the scan. For a count limit the
    /// triggering item has already been buffered.
    StopAll(StopReason),
    /// The current unit has aged out; move on to the next unit
    StopUnit(StopReason),
}

impl ProcessOutcome {
    /// Unwrap the single-shot (scrape) path: accepted items pass through,
    /// stop signals surface as errors.
    pub fn into_item(self) -> Result<ScrapedItem> {
        match self {
            Self::Accepted(item) => Ok(item),
            Self::StopAll(reason) => Err(ScanError::LimitReached(reason.to_string())),
            Self::StopUnit(reason) => Err(ScanError::EpochReached(reason.to_string())),
        }
    }
}

/// Enforces scan bounds, buffers accepted items and flushes them downstream.
///
/// Without a sink the consumer accumulates purely in memory, for callers
/// that return the whole result synchronously.
pub struct ItemConsumer {
    source: SourceId,
    bounds: ScanBounds,
    started_at: Instant,
    accepted: u32,
    buffer: Vec<ScrapedItem>,
    sink: Option<Arc<dyn ItemSink>>,
    reporter: Arc<dyn Reporter>,
}

impl ItemConsumer {
    /// Create a consumer for one invocation.
    #[must_use]
    pub fn new(
        source: SourceId,
        bounds: ScanBounds,
        sink: Option<Arc<dyn ItemSink>>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        tracing::info!(
            %source,
            delivery = sink.is_some(),
            limit_count = ?bounds.limit_count,
            limit_seconds = ?bounds.limit_seconds,
            epoch_oldest = ?bounds.epoch_oldest,
            epoch_youngest = ?bounds.epoch_youngest,
            "initialized consumer"
        );
        Self {
            source,
            bounds,
            started_at: Instant::now(),
            accepted: 0,
            buffer: Vec::new(),
            sink,
            reporter,
        }
    }

    /// Swallow one candidate and decide whether the caller should go on.
    ///
    /// Checks run in a fixed order: wall-clock budget, publish-age cutoff,
    /// then buffering, then the count budget (so the item that hits the
    /// count is included in the result), then the auto-flush threshold.
    ///
    /// # Errors
    /// Only a failed auto-flush (sink fault) is an error; stop decisions
    /// are regular outcomes.
    pub async fn process(&mut self, item: ScrapedItem) -> Result<ProcessOutcome> {
        if let Some(limit_seconds) = self.bounds.limit_seconds {
            if self.started_at.elapsed() > Duration::from_secs(limit_seconds) {
                return Ok(ProcessOutcome::StopAll(StopReason::TimeLimit {
                    limit_seconds,
                }));
            }
        }

        if let (Some(epoch_oldest), Some(epoch_published)) =
            (self.bounds.epoch_oldest, item.payload.epoch_published)
        {
            if epoch_published < epoch_oldest {
                return Ok(ProcessOutcome::StopUnit(StopReason::PublishedTooOld {
                    epoch_published,
                    epoch_oldest,
                }));
            }
        }

        self.buffer.push(item.clone());
        self.accepted += 1;
        tracing::info!(
            accepted = self.accepted,
            limit = ?self.bounds.limit_count,
            "accepted scraped item"
        );

        if let Some(limit_count) = self.bounds.limit_count {
            if self.accepted >= limit_count {
                return Ok(ProcessOutcome::StopAll(StopReason::CountLimit {
                    limit_count,
                }));
            }
        }

        if self.sink.is_some() && self.buffer.len() > FLUSH_THRESHOLD {
            tracing::info!(buffered = self.buffer.len(), "auto-flush threshold exceeded");
            self.flush().await?;
        }

        Ok(ProcessOutcome::Accepted(item))
    }

    /// Send the buffered items downstream as one batch.
    ///
    /// A no-op without a sink. The buffer is cleared only after the sink
    /// accepts the batch; a sink fault propagates and keeps the buffer, so
    /// the batch can still be delivered by a later attempt.
    pub async fn flush(&mut self) -> Result<()> {
        let Some(sink) = &self.sink else {
            tracing::info!("flush: delivery disabled, keeping items in memory");
            return Ok(());
        };

        if self.buffer.is_empty() {
            tracing::debug!("flush: nothing buffered");
            return Ok(());
        }

        tracing::debug!(count = self.buffer.len(), "flushing buffer downstream");
        let batch = ItemBatch {
            source: self.source.clone(),
            objects: self.buffer.clone(),
        };
        sink.deliver(batch).await?;

        let first = &self.buffer[0];
        self.reporter.info(
            self.source.as_str(),
            &format!(
                "flushed {} items (1st one: {} | {})",
                self.buffer.len(),
                first.native_url,
                if first.is_complete { "complete" } else { "incomplete" },
            ),
        );

        self.buffer.clear();
        Ok(())
    }

    /// Items accumulated so far, without flushing.
    #[must_use]
    pub fn buffered(&self) -> &[ScrapedItem] {
        &self.buffer
    }

    /// Number of items accepted over the consumer's lifetime.
    #[must_use]
    pub fn accepted_count(&self) -> u32 {
        self.accepted
    }

    /// Source this consumer was created for.
    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Bounds constraining this invocation.
    #[must_use]
    pub fn bounds(&self) -> &ScanBounds {
        &self.bounds
    }
}
