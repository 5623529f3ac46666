//! Bazaar Scanner - scan and scrape orchestration.
//!
//! This crate drives the harvesting of marketplace listings: the consumer
//! that enforces scan bounds and buffers/flushes results, the per-source
//! orchestrators walking paginated category listings, the registry
//! dispatching a source identifier to its orchestrator, and the invocation
//! API with synchronous and fire-and-forget modes.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_scanner::{api, ScraperRegistry};
//! use bazaar_core::AppConfig;
//! use std::sync::Arc;
//!
//! let config = AppConfig::load_with_env()?;
//! let registry = Arc::new(ScraperRegistry::new(config.renderer));
//!
//! let reply = api::scan_source(
//!     &registry,
//!     "tradera",
//!     api::ScanRequest {
//!         limit_count: Some(10),
//!         synchronous: true,
//!         ..Default::default()
//!     },
//! )
//! .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod consumer;
pub mod error;
pub mod registry;
pub mod report;
pub mod sink;
pub mod source;
pub mod sources;

// Re-export commonly used types
pub use consumer::{ItemConsumer, ProcessOutcome, StopReason};
pub use error::{Result, ScanError};
pub use registry::ScraperRegistry;
pub use report::{LogReporter, Reporter, WebhookReporter};
pub use sink::{HttpSink, ItemSink, SinkError};
pub use source::{run_scan, run_scrape, SourceScraper};
