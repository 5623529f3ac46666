//! Downstream delivery of flushed item batches.

use async_trait::async_trait;
use bazaar_core::ItemBatch;
use thiserror::Error;

/// Faults reported by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The request never completed
    #[error("sink request failed: {0}")]
    Http(String),

    /// The sink replied with a failure
    #[error("sink rejected batch: {0}")]
    Rejected(String),
}

/// External system receiving flushed batches of accepted items.
///
/// A delivery failure is fatal to the flush that attempted it; the consumer
/// keeps its buffer in that case.
#[async_trait]
pub trait ItemSink: Send + Sync {
    /// Deliver one batch. Must only return `Ok` once the batch is accepted.
    async fn deliver(&self, batch: ItemBatch) -> std::result::Result<(), SinkError>;
}

/// Sink POSTing batches as JSON to an HTTP endpoint.
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    /// Create a sink delivering to `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ItemSink for HttpSink {
    async fn deliver(&self, batch: ItemBatch) -> std::result::Result<(), SinkError> {
        let count = batch.objects.len();
        let response = self
            .client
            .post(&self.endpoint)
            .json(&batch)
            .send()
            .await
            .map_err(|e| SinkError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected(format!("{status}: {body}")));
        }

        tracing::debug!(count, source = %batch.source, "delivered batch downstream");
        Ok(())
    }
}
