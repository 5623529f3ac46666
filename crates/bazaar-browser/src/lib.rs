//! Rendered-page fetching for marketplace scraping.
//!
//! Provides the fetch-retry-and-fallback transport used by the per-source
//! scrapers: either a locally driven headless Chromium or a remote
//! rendering service, behind one retrying engine, plus the pure text
//! utilities parsers lean on.

pub mod engine;
pub mod error;
pub mod text;

pub use engine::{
    FetchEngine, LocalDriver, PageFetcher, RemoteRenderer, RenderingStrategy, Via, WaitCondition,
};
pub use error::{FetchError, Result};
pub use text::{find_number, html_to_text};
