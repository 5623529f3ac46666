//! Bazaar Core - shared types and configuration.
//!
//! This crate defines the domain types passed between the transport, the
//! consumer and the per-source scrapers, plus the TOML/env configuration
//! loader used to wire up a process.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, RendererConfig, RendererMode, ReportingConfig, SinkConfig};
pub use error::{ConfigError, ConfigResult, CoreError};
pub use types::{ItemBatch, ItemPayload, ScanBounds, ScrapedItem, SourceId};
