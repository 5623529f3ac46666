//! The closed error taxonomy of the scanner.
//!
//! Every fault a scan or scrape can surface is one variant of [`ScanError`];
//! each carries its human-readable message format and a stable code for
//! callers that classify by kind rather than by message.

use crate::sink::SinkError;
use bazaar_browser::FetchError;
use thiserror::Error;

/// Result type alias using [`ScanError`].
pub type Result<T> = std::result::Result<T, ScanError>;

/// Faults surfaced by scans, scrapes and their collaborators.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Operation not supported by this source
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Caller-supplied input was invalid
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),

    /// A page did not match the structure the source's parser expects
    #[error("parser error: {0}")]
    Parser(String),

    /// The transport exhausted its attempts for a url
    #[error("failed to fetch url {0}")]
    CannotGetUrl(String),

    /// A count or wall-clock bound ended the operation (single-shot path)
    #[error("scan limit reached: {0}")]
    LimitReached(String),

    /// The publish-age cutoff ended the operation (single-shot path)
    #[error("epoch boundary reached: {0}")]
    EpochReached(String),

    /// The parser decided this candidate should be dropped
    #[error("skipping this item: {0}")]
    SkipItem(String),

    /// The source identifier matches no registered scraper
    #[error("don't know how to process items from source {0}")]
    UnknownSource(String),

    /// The downstream sink refused or failed to take a batch
    #[error("sink delivery failed: {0}")]
    SinkDelivery(#[from] SinkError),

    /// Transport fault below the retry layer
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

impl ScanError {
    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
            Self::Parser(_) => "PARSER_ERROR",
            Self::CannotGetUrl(_) => "CANNOT_GET_URL",
            Self::LimitReached(_) => "CONSUMER_LIMIT_REACHED",
            Self::EpochReached(_) => "CONSUMER_EPOCH_REACHED",
            Self::SkipItem(_) => "SKIP_ITEM_ERROR",
            Self::UnknownSource(_) => "UNKNOWN_SOURCE_ERROR",
            Self::SinkDelivery(_) => "API_CALL_ERROR",
            Self::Fetch(_) => "FETCH_ERROR",
        }
    }
}
