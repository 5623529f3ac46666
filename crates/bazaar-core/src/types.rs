//! Shared domain types for the bazaar harvester.
//!
//! These types flow between the transport, the consumer and the per-source
//! scrapers: what a scraped listing looks like, what bounds constrain a
//! scan, and what a batch sent downstream contains.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a marketplace source, e.g. `TRADERA`.
///
/// Input is case-insensitive; the identifier is normalized to uppercase so
/// that registry lookups and envelopes always agree on one spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Create a new `SourceId`, normalizing to uppercase.
    ///
    /// # Errors
    /// Returns error if the identifier is empty or whitespace-only.
    pub fn new(id: impl AsRef<str>) -> Result<Self, CoreError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(CoreError::Validation(
                "source identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(id.to_uppercase()))
    }

    /// Get the normalized identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds constraining a scan.
///
/// All fields are optional; an unset field means "not bounded in that
/// dimension". `epoch_*` values are epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanBounds {
    /// Upper bound on publish time; echoed back to callers
    pub epoch_youngest: Option<i64>,
    /// Lower bound on publish time; items older than this stop the unit
    pub epoch_oldest: Option<i64>,
    /// Maximum number of accepted items for the whole scan
    pub limit_count: Option<u32>,
    /// Wall-clock budget in seconds for the whole scan
    pub limit_seconds: Option<u64>,
}

impl ScanBounds {
    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns error if both epochs are set and `epoch_oldest > epoch_youngest`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(oldest), Some(youngest)) = (self.epoch_oldest, self.epoch_youngest) {
            if oldest > youngest {
                return Err(CoreError::Validation(format!(
                    "epoch_oldest ({oldest}) must not be greater than epoch_youngest ({youngest})"
                )));
            }
        }
        Ok(())
    }
}

/// One listing harvested from a marketplace.
///
/// Created by a source's parser, owned by the consumer until flushed, then
/// owned by the downstream sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedItem {
    /// Canonical URL of the listing on its marketplace
    pub native_url: String,
    /// Whether the payload is fully resolved (detail page) or a listing-page
    /// summary lacking fields such as description and exact publish time
    pub is_complete: bool,
    /// Structured listing data
    pub payload: ItemPayload,
}

/// Structured data of a scraped listing.
///
/// A listing-page summary fills only a subset; a resolved detail page fills
/// most of it. An ended listing carries only `has_ended` and `epoch_ended`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    /// Listing title
    pub title: Option<String>,
    /// Plain-text description, normalized from the listing HTML
    pub description: Option<String>,
    /// Price in the source's currency unit
    pub price: Option<i64>,
    /// Fixed price vs. current bid
    pub price_is_fixed: bool,
    /// ISO currency code, e.g. `SEK`
    pub currency: Option<String>,
    /// ISO country code of the marketplace
    pub country: Option<String>,
    /// Language of the listing text
    pub language: Option<String>,
    /// Whether the listing has ended (auction closed / item removed)
    pub has_ended: bool,
    /// Publish time in epoch seconds, when known
    pub epoch_published: Option<i64>,
    /// End time in epoch seconds, for ended listings
    pub epoch_ended: Option<i64>,
    /// URL of the primary picture
    pub native_picture_url: Option<String>,
    /// Marketplace-native document id
    pub native_doc_id: Option<String>,
    /// Seller display name
    pub native_seller_name: Option<String>,
    /// Whether the seller is a shop rather than a private person
    pub native_seller_is_shop: Option<bool>,
}

/// A batch of scraped items delivered to the downstream sink in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBatch {
    /// Source the items were harvested from
    pub source: SourceId,
    /// Items, in discovery order (newest first for scans)
    pub objects: Vec<ScrapedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_normalizes_case() {
        let id = SourceId::new("tradera").expect("valid source id");
        assert_eq!(id.as_str(), "TRADERA");
        assert_eq!(id.to_string(), "TRADERA");

        let id = SourceId::new("  Test ").expect("valid source id");
        assert_eq!(id.as_str(), "TEST");
    }

    #[test]
    fn test_source_id_rejects_empty() {
        assert!(SourceId::new("").is_err());
        assert!(SourceId::new("   ").is_err());
    }

    #[test]
    fn test_bounds_validation() {
        let bounds = ScanBounds {
            epoch_youngest: Some(2_000),
            epoch_oldest: Some(1_000),
            ..ScanBounds::default()
        };
        assert!(bounds.validate().is_ok());

        let bounds = ScanBounds {
            epoch_youngest: Some(1_000),
            epoch_oldest: Some(2_000),
            ..ScanBounds::default()
        };
        assert!(bounds.validate().is_err());

        // One-sided and empty bounds are always consistent
        assert!(ScanBounds::default().validate().is_ok());
        let bounds = ScanBounds {
            epoch_oldest: Some(2_000),
            ..ScanBounds::default()
        };
        assert!(bounds.validate().is_ok());
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let item = ScrapedItem {
            native_url: "https://www.tradera.com/item/123".to_string(),
            is_complete: false,
            payload: ItemPayload {
                title: Some("Mini Kånken".to_string()),
                price: Some(280),
                currency: Some("SEK".to_string()),
                ..ItemPayload::default()
            },
        };

        let json = serde_json::to_string(&item).expect("serialize");
        let back: ScrapedItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(item, back);
    }
}
